//! # Partition Correction Protocol
//!
//! The core of the crate: one corrector per partition racing to observe the
//! first live event, a shared cancellation flag, and a coordinator that fans
//! out across the stream's partitions and joins every worker.

pub mod cancellation;
pub mod coordinator;
pub mod partition;

pub use cancellation::CancellationFlag;
pub use coordinator::{CorrectionCoordinator, PartitionCorrection, PartitionFailure, RunReport};
pub use partition::{PartitionCorrector, PartitionOutcome};
