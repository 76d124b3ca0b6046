#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Stream Checkpoint Corrector
//!
//! Repairs per-partition checkpoint records for a partitioned event-stream
//! consumer framework. When a persisted checkpoint goes stale or out of sync
//! with the actual stream position, this crate observes the live tail of each
//! partition, captures the true current offset and sequence number from the
//! first message it sees, and rewrites only those two fields into the stored
//! record. Lease metadata (owner, token, epoch) passes through untouched.
//!
//! ## Protocol
//!
//! One corrector per partition, all launched concurrently and joined at the
//! end:
//!
//! 1. Attach a receiver at the partition's *current tail* (never a stored
//!    offset).
//! 2. Loop on bounded batch receives, checking the shared cancellation flag
//!    before each attempt.
//! 3. First message wins: the rest of the batch is discarded, the corrector
//!    performs one read-modify-write of the checkpoint blob and stops.
//!
//! Partitions are independent failure domains; one partition's error never
//! aborts its siblings, and the coordinator reports every partition's outcome
//! (corrected, cancelled, or failed) once all are terminal.
//!
//! ## Collaborators
//!
//! The stream transport and the checkpoint blob store are consumed through
//! the [`stream::StreamClient`] / [`stream::PartitionReceiver`] and
//! [`checkpoint::BlobStore`] traits; callers supply adapters over their
//! vendor SDKs and hand them to [`runner::run_until_complete`].
//!
//! ## Module Organization
//!
//! - [`checkpoint`] - checkpoint record, codec, and store accessor
//! - [`stream`] - consumed stream-transport interface
//! - [`corrector`] - per-partition correctors, cancellation, fan-out coordinator
//! - [`runner`] - run surface with interrupt handling
//! - [`config`] - layered process configuration
//! - [`error`] - structured error handling
//! - [`logging`] - tracing initialization
//! - [`test_support`] - in-memory collaborator fakes for tests

pub mod checkpoint;
pub mod config;
pub mod corrector;
pub mod error;
pub mod logging;
pub mod runner;
pub mod stream;
pub mod test_support;

pub use checkpoint::{BlobStore, CheckpointRecord, CheckpointStoreAccessor};
pub use config::CorrectorConfig;
pub use corrector::{
    CancellationFlag, CorrectionCoordinator, PartitionCorrection, PartitionCorrector,
    PartitionFailure, PartitionOutcome, RunReport,
};
pub use error::{CorrectionError, Result};
pub use stream::{LiveEvent, PartitionReceiver, StreamClient};
