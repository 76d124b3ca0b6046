//! # Checkpoint Record and Store Access
//!
//! The persisted checkpoint record, its codec, and scoped read-then-overwrite
//! access to one partition's checkpoint blob.

pub mod record;
pub mod store;

pub use record::CheckpointRecord;
pub use store::{BlobStore, CheckpointStoreAccessor};
