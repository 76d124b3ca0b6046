//! # Test Support
//!
//! In-memory collaborator implementations used by this crate's unit and
//! integration tests: a blob store backed by a map, a scripted stream client
//! whose partitions replay pre-arranged batches, and a write-gating store
//! wrapper for exercising cancellation while a correction is in flight.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::checkpoint::BlobStore;
use crate::error::{CorrectionError, Result};
use crate::stream::{LiveEvent, PartitionReceiver, StreamClient};

/// Build a live event with the given position and an enqueue time of now.
pub fn live_event(offset: &str, sequence_number: &str) -> LiveEvent {
    LiveEvent {
        enqueued_at: Utc::now(),
        offset: offset.to_string(),
        sequence_number: sequence_number.to_string(),
    }
}

/// Map-backed [`BlobStore`] keyed by `(container, blob_name)`.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<(String, String), Vec<u8>>>,
    unavailable: Mutex<Option<String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob directly, bypassing the trait surface.
    pub fn put(&self, container: &str, blob_name: &str, content: Vec<u8>) {
        self.blobs
            .lock()
            .insert((container.to_string(), blob_name.to_string()), content);
    }

    /// Current content of a blob, if present.
    pub fn get(&self, container: &str, blob_name: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .get(&(container.to_string(), blob_name.to_string()))
            .cloned()
    }

    /// Make every subsequent store operation fail with `StoreUnavailable`.
    pub fn set_unavailable(&self, message: &str) {
        *self.unavailable.lock() = Some(message.to_string());
    }

    fn check_available(&self, operation: &str) -> Result<()> {
        match self.unavailable.lock().as_ref() {
            Some(message) => Err(CorrectionError::store_unavailable(operation, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn read_blob(&self, container: &str, blob_name: &str) -> Result<Vec<u8>> {
        self.check_available("read_blob")?;
        self.get(container, blob_name)
            .ok_or_else(|| CorrectionError::record_not_found(blob_name))
    }

    async fn write_blob(&self, container: &str, blob_name: &str, content: Vec<u8>) -> Result<()> {
        self.check_available("write_blob")?;
        self.put(container, blob_name, content);
        Ok(())
    }
}

/// [`BlobStore`] wrapper whose writes can be held open and released later.
///
/// Used to park a corrector inside its read-modify-write so tests can assert
/// that cancellation requested mid-correction still lets the write complete.
pub struct GatedBlobStore {
    inner: Arc<dyn BlobStore>,
    hold_tx: watch::Sender<bool>,
    hold_rx: watch::Receiver<bool>,
    parked_tx: watch::Sender<usize>,
    parked_rx: watch::Receiver<usize>,
}

impl GatedBlobStore {
    pub fn new(inner: Arc<dyn BlobStore>) -> Self {
        let (hold_tx, hold_rx) = watch::channel(false);
        let (parked_tx, parked_rx) = watch::channel(0);
        Self {
            inner,
            hold_tx,
            hold_rx,
            parked_tx,
            parked_rx,
        }
    }

    /// Park subsequent writes until [`release_writes`](Self::release_writes).
    pub fn hold_writes(&self) {
        let _ = self.hold_tx.send(true);
    }

    /// Let parked and future writes proceed.
    pub fn release_writes(&self) {
        let _ = self.hold_tx.send(false);
    }

    /// Wait until at least `count` writers are parked at the gate.
    pub async fn wait_for_parked_writes(&self, count: usize) {
        let mut parked = self.parked_rx.clone();
        while *parked.borrow() < count {
            if parked.changed().await.is_err() {
                break;
            }
        }
    }
}

#[async_trait]
impl BlobStore for GatedBlobStore {
    async fn read_blob(&self, container: &str, blob_name: &str) -> Result<Vec<u8>> {
        self.inner.read_blob(container, blob_name).await
    }

    async fn write_blob(&self, container: &str, blob_name: &str, content: Vec<u8>) -> Result<()> {
        if *self.hold_rx.borrow() {
            self.parked_tx.send_modify(|n| *n += 1);
            let mut gate = self.hold_rx.clone();
            while *gate.borrow() {
                if gate.changed().await.is_err() {
                    break;
                }
            }
            self.parked_tx.send_modify(|n| *n -= 1);
        }
        self.inner.write_blob(container, blob_name, content).await
    }
}

enum ReceiveStep {
    Batch(Vec<LiveEvent>),
    Error(CorrectionError),
}

/// Scripted replay state for one partition's receiver.
///
/// A partition with an exhausted script behaves like a quiet live partition:
/// each receive yields briefly and returns an empty batch, so correctors keep
/// looping and observing the cancellation flag exactly as they would against
/// a real transport.
#[derive(Default)]
pub struct ScriptedPartition {
    steps: Mutex<VecDeque<ReceiveStep>>,
    attach_error: Mutex<Option<CorrectionError>>,
}

impl ScriptedPartition {
    /// Queue a batch (possibly empty) to be returned by one receive call.
    pub fn push_batch(&self, events: Vec<LiveEvent>) {
        self.steps.lock().push_back(ReceiveStep::Batch(events));
    }

    /// Queue a receive failure.
    pub fn push_error(&self, error: CorrectionError) {
        self.steps.lock().push_back(ReceiveStep::Error(error));
    }

    /// Make `create_tail_receiver` fail for this partition.
    pub fn fail_attach(&self, error: CorrectionError) {
        *self.attach_error.lock() = Some(error);
    }
}

struct ScriptedReceiver {
    partition: Arc<ScriptedPartition>,
}

#[async_trait]
impl PartitionReceiver for ScriptedReceiver {
    async fn receive_batch(&mut self, max_count: usize) -> Result<Vec<LiveEvent>> {
        let step = self.partition.steps.lock().pop_front();
        match step {
            Some(ReceiveStep::Batch(mut events)) => {
                events.truncate(max_count);
                Ok(events)
            }
            Some(ReceiveStep::Error(error)) => Err(error),
            None => {
                // Quiet partition: empty batches until something is scripted
                tokio::time::sleep(Duration::from_millis(2)).await;
                Ok(Vec::new())
            }
        }
    }
}

/// Scripted [`StreamClient`] with a fixed, ordered partition set.
#[derive(Default)]
pub struct ScriptedStreamClient {
    partitions: Mutex<Vec<(String, Arc<ScriptedPartition>)>>,
}

impl ScriptedStreamClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a partition; returns its script handle.
    pub fn add_partition(&self, partition_id: &str) -> Arc<ScriptedPartition> {
        let partition = Arc::new(ScriptedPartition::default());
        self.partitions
            .lock()
            .push((partition_id.to_string(), partition.clone()));
        partition
    }
}

#[async_trait]
impl StreamClient for ScriptedStreamClient {
    async fn partition_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .partitions
            .lock()
            .iter()
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn create_tail_receiver(
        &self,
        _consumer_group: &str,
        partition_id: &str,
    ) -> Result<Box<dyn PartitionReceiver>> {
        let partition = self
            .partitions
            .lock()
            .iter()
            .find(|(id, _)| id == partition_id)
            .map(|(_, p)| p.clone())
            .ok_or_else(|| {
                CorrectionError::stream_unavailable(
                    "create_tail_receiver",
                    format!("unknown partition {partition_id}"),
                )
            })?;

        if let Some(error) = partition.attach_error.lock().take() {
            return Err(error);
        }

        Ok(Box::new(ScriptedReceiver { partition }))
    }
}
