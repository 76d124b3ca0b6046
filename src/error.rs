//! # Correction Error Types
//!
//! Structured error handling for the checkpoint correction pipeline using
//! thiserror instead of `Box<dyn Error>` patterns. Every variant carries the
//! context needed to diagnose which partition failed and during which
//! operation.

use thiserror::Error;

/// Errors surfaced by the checkpoint correction pipeline.
///
/// Cancellation is deliberately absent: a partition that shuts down before
/// observing a live event is a successful early exit, reported as
/// [`PartitionOutcome::Cancelled`](crate::corrector::PartitionOutcome), not an
/// error.
#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("Checkpoint record not found for partition {partition_id}")]
    RecordNotFound { partition_id: String },

    #[error("Malformed checkpoint record for partition {partition_id}: {message}")]
    MalformedRecord {
        partition_id: String,
        message: String,
    },

    #[error("Checkpoint store unavailable: {operation}: {message}")]
    StoreUnavailable { operation: String, message: String },

    #[error("Event stream unavailable: {operation}: {message}")]
    StreamUnavailable { operation: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Corrector task for partition {partition_id} panicked: {message}")]
    TaskPanic {
        partition_id: String,
        message: String,
    },
}

impl CorrectionError {
    /// Create a record-not-found error
    pub fn record_not_found(partition_id: impl Into<String>) -> Self {
        Self::RecordNotFound {
            partition_id: partition_id.into(),
        }
    }

    /// Create a malformed-record error
    pub fn malformed_record(partition_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            partition_id: partition_id.into(),
            message: message.into(),
        }
    }

    /// Create a store-unavailable error
    pub fn store_unavailable(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a stream-unavailable error
    pub fn stream_unavailable(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StreamUnavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a task-panic error
    pub fn task_panic(partition_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskPanic {
            partition_id: partition_id.into(),
            message: message.into(),
        }
    }

    /// The partition this error belongs to, when the error is partition-scoped.
    pub fn partition_id(&self) -> Option<&str> {
        match self {
            Self::RecordNotFound { partition_id }
            | Self::MalformedRecord { partition_id, .. }
            | Self::TaskPanic { partition_id, .. } => Some(partition_id),
            _ => None,
        }
    }
}

/// Result type alias for correction operations
pub type Result<T> = std::result::Result<T, CorrectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let not_found = CorrectionError::record_not_found("4");
        assert!(matches!(not_found, CorrectionError::RecordNotFound { .. }));
        assert_eq!(not_found.partition_id(), Some("4"));

        let malformed = CorrectionError::malformed_record("1", "expected value at line 1");
        assert!(matches!(malformed, CorrectionError::MalformedRecord { .. }));

        let store = CorrectionError::store_unavailable("read_blob", "connection refused");
        assert!(matches!(store, CorrectionError::StoreUnavailable { .. }));
        assert_eq!(store.partition_id(), None);
    }

    #[test]
    fn test_error_display() {
        let err = CorrectionError::malformed_record("3", "unexpected end of input");
        let display = format!("{err}");
        assert!(display.contains("partition 3"));
        assert!(display.contains("unexpected end of input"));

        let err = CorrectionError::stream_unavailable("create_tail_receiver", "auth failed");
        let display = format!("{err}");
        assert!(display.contains("Event stream unavailable"));
        assert!(display.contains("create_tail_receiver"));
        assert!(display.contains("auth failed"));
    }
}
