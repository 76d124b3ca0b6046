//! # Partition Corrector
//!
//! For one partition: attach at the live tail, wait for the first event,
//! rewrite the stored checkpoint's position fields from it, stop. A corrector
//! is single-shot; the receiver it creates is dropped as soon as the
//! partition reaches a terminal state.

use tracing::{debug, info};

use crate::checkpoint::CheckpointStoreAccessor;
use crate::error::Result;
use crate::stream::StreamClient;

use super::cancellation::CancellationFlag;

/// Terminal outcome of one partition's corrector.
///
/// Failures are expressed through `Err(CorrectionError)`, not through this
/// enum; cancellation is a successful early exit that touched no state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionOutcome {
    /// The checkpoint record was rewritten to the observed live position.
    Corrected {
        offset: String,
        sequence_number: String,
    },
    /// Cancellation was requested before any live event arrived.
    Cancelled,
}

/// One partition's correction worker.
///
/// Lifecycle: attaching -> listening -> correcting -> done, with cancellation
/// observed before each receive attempt. Once a corrector starts correcting
/// it always completes the read-modify-write, even if cancellation is
/// requested mid-flight.
pub struct PartitionCorrector {
    partition_id: String,
    consumer_group: String,
    batch_size: usize,
    accessor: CheckpointStoreAccessor,
    cancellation: CancellationFlag,
}

impl PartitionCorrector {
    pub fn new(
        partition_id: impl Into<String>,
        consumer_group: impl Into<String>,
        batch_size: usize,
        accessor: CheckpointStoreAccessor,
        cancellation: CancellationFlag,
    ) -> Self {
        Self {
            partition_id: partition_id.into(),
            consumer_group: consumer_group.into(),
            batch_size,
            accessor,
            cancellation,
        }
    }

    /// Run the corrector to a terminal state.
    ///
    /// Errors from the stream or the checkpoint store are fatal for this
    /// partition and propagate without retry; they never affect sibling
    /// partitions.
    pub async fn run(self, client: &dyn StreamClient) -> Result<PartitionOutcome> {
        debug!(
            partition_id = %self.partition_id,
            consumer_group = %self.consumer_group,
            phase = "attaching",
            "Attaching tail receiver"
        );
        let mut receiver = client
            .create_tail_receiver(&self.consumer_group, &self.partition_id)
            .await?;

        loop {
            // The only cancellation check point: never inside a correction.
            if self.cancellation.is_requested() {
                info!(
                    partition_id = %self.partition_id,
                    phase = "cancelled",
                    "Cancellation requested before a live event arrived, leaving checkpoint untouched"
                );
                return Ok(PartitionOutcome::Cancelled);
            }

            debug!(
                partition_id = %self.partition_id,
                phase = "listening",
                "Listening for live events"
            );
            let batch = receiver.receive_batch(self.batch_size).await?;

            // First message wins; the rest of the batch is discarded. We are
            // capturing one current position, not consuming the stream.
            let Some(event) = batch.into_iter().next() else {
                continue;
            };

            info!(
                partition_id = %self.partition_id,
                enqueued_at = %event.enqueued_at,
                offset = %event.offset,
                sequence_number = %event.sequence_number,
                phase = "correcting",
                "Live event observed, correcting checkpoint record"
            );

            let mut record = self.accessor.read_current(&self.partition_id).await?;
            record.apply_position(&event);
            self.accessor
                .write_updated(&self.partition_id, &record)
                .await?;

            info!(
                partition_id = %self.partition_id,
                offset = %event.offset,
                sequence_number = %event.sequence_number,
                phase = "done",
                "Checkpoint record corrected"
            );
            return Ok(PartitionOutcome::Corrected {
                offset: event.offset,
                sequence_number: event.sequence_number,
            });
        }
    }
}
