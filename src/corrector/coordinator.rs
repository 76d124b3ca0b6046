//! # Fan-out Coordinator
//!
//! Discovers the stream's partitions once, launches one partition corrector
//! per partition concurrently, and joins them all. Partitions are independent
//! failure domains: one corrector's error never aborts its siblings, and the
//! full per-partition outcome set is surfaced to the caller in a
//! [`RunReport`].

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::checkpoint::CheckpointStoreAccessor;
use crate::error::{CorrectionError, Result};
use crate::stream::StreamClient;

use super::cancellation::CancellationFlag;
use super::partition::{PartitionCorrector, PartitionOutcome};

/// A successfully corrected partition and the position written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionCorrection {
    pub partition_id: String,
    pub offset: String,
    pub sequence_number: String,
}

/// A partition whose corrector failed, with the fatal error.
#[derive(Debug)]
pub struct PartitionFailure {
    pub partition_id: String,
    pub error: CorrectionError,
}

/// Per-partition outcomes of one complete correction run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Partitions whose checkpoint record was rewritten.
    pub corrected: Vec<PartitionCorrection>,
    /// Partitions that shut down before observing a live event.
    pub cancelled: Vec<String>,
    /// Partitions whose corrector failed fatally.
    pub failed: Vec<PartitionFailure>,
}

impl RunReport {
    /// Total number of partitions that reached a terminal state.
    pub fn partition_count(&self) -> usize {
        self.corrected.len() + self.cancelled.len() + self.failed.len()
    }

    /// Whether every partition was corrected.
    pub fn is_fully_corrected(&self) -> bool {
        self.cancelled.is_empty() && self.failed.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Launches and joins one [`PartitionCorrector`] per partition.
pub struct CorrectionCoordinator {
    client: Arc<dyn StreamClient>,
    accessor: CheckpointStoreAccessor,
    consumer_group: String,
    batch_size: usize,
}

impl CorrectionCoordinator {
    pub fn new(
        client: Arc<dyn StreamClient>,
        accessor: CheckpointStoreAccessor,
        consumer_group: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        Self {
            client,
            accessor,
            consumer_group: consumer_group.into(),
            batch_size,
        }
    }

    /// Run every partition's corrector to a terminal state.
    ///
    /// Partition discovery happens once; the set is fixed for the run. All
    /// correctors are spawned before any is awaited. The returned report is
    /// `Ok` even when individual partitions failed; only partition discovery
    /// itself can fail the run as a whole.
    pub async fn run(&self, cancellation: &CancellationFlag) -> Result<RunReport> {
        let partitions = self.client.partition_ids().await?;
        info!(
            partition_count = partitions.len(),
            consumer_group = %self.consumer_group,
            container = %self.accessor.container(),
            "Starting correction run across all partitions"
        );

        let mut handles = Vec::with_capacity(partitions.len());
        for partition_id in partitions {
            let corrector = PartitionCorrector::new(
                partition_id.clone(),
                self.consumer_group.clone(),
                self.batch_size,
                self.accessor.clone(),
                cancellation.clone(),
            );
            let client = self.client.clone();

            let handle = tokio::spawn(async move { corrector.run(client.as_ref()).await });
            handles.push((partition_id, handle));
        }

        let joined = futures::future::join_all(
            handles
                .into_iter()
                .map(|(partition_id, handle)| async move { (partition_id, handle.await) }),
        )
        .await;

        let mut report = RunReport::default();
        for (partition_id, result) in joined {
            match result {
                Ok(Ok(PartitionOutcome::Corrected {
                    offset,
                    sequence_number,
                })) => {
                    report.corrected.push(PartitionCorrection {
                        partition_id,
                        offset,
                        sequence_number,
                    });
                }
                Ok(Ok(PartitionOutcome::Cancelled)) => {
                    debug!(partition_id = %partition_id, "Partition cancelled without a write");
                    report.cancelled.push(partition_id);
                }
                Ok(Err(e)) => {
                    error!(partition_id = %partition_id, error = %e, "Partition correction failed");
                    report.failed.push(PartitionFailure {
                        partition_id,
                        error: e,
                    });
                }
                Err(join_error) => {
                    error!(partition_id = %partition_id, error = %join_error, "Corrector task panicked");
                    report.failed.push(PartitionFailure {
                        partition_id: partition_id.clone(),
                        error: CorrectionError::task_panic(partition_id, join_error.to_string()),
                    });
                }
            }
        }

        info!(
            corrected = report.corrected.len(),
            cancelled = report.cancelled.len(),
            failed = report.failed.len(),
            "Correction run completed"
        );
        Ok(report)
    }
}
