//! # Event Stream Collaborator Interface
//!
//! The consumed surface of the stream transport. The corrector never owns a
//! transport client of its own; callers hand it a [`StreamClient`]
//! implementation (typically a thin adapter over the vendor SDK) and the
//! corrector drives it through these two traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// One message observed on a partition's live tail.
///
/// Transient: it lives for the duration of one batch-receive call and is only
/// used to capture the partition's current position. Transport adapters
/// project the transport's system properties (the `x-opt-enqueued-time`,
/// `x-opt-offset` and `x-opt-sequence-number` convention) into these fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveEvent {
    /// Transport-assigned enqueue time.
    pub enqueued_at: DateTime<Utc>,
    /// Opaque stream-position token.
    pub offset: String,
    /// Monotonically increasing sequence number, string-encoded.
    pub sequence_number: String,
}

/// A live receiver attached to one partition.
#[async_trait]
pub trait PartitionReceiver: Send {
    /// Receive the next batch of live events, up to `max_count`.
    ///
    /// May return an empty batch; callers loop on the same receive call.
    /// There is no fixed timeout. Transport or auth failures surface as
    /// [`StreamUnavailable`](crate::error::CorrectionError::StreamUnavailable).
    async fn receive_batch(&mut self, max_count: usize) -> Result<Vec<LiveEvent>>;
}

/// Connected client for the target event stream.
#[async_trait]
pub trait StreamClient: Send + Sync {
    /// Partition identifiers of the stream, in the transport's order.
    ///
    /// Discovered once at startup; the set is fixed for a run.
    async fn partition_ids(&self) -> Result<Vec<String>>;

    /// Attach a receiver to one partition at its *current tail*.
    ///
    /// Tail attach is the contract: the corrector never resumes from a stored
    /// offset, it only captures the position of the next live message.
    async fn create_tail_receiver(
        &self,
        consumer_group: &str,
        partition_id: &str,
    ) -> Result<Box<dyn PartitionReceiver>>;
}
