//! # Checkpoint Store Accessor
//!
//! Scoped read-then-overwrite access to one partition's checkpoint blob. The
//! blob store itself is a consumed collaborator behind the [`BlobStore`]
//! trait; this module owns the container addressing scheme and the codec
//! round-trip, nothing else.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

use super::record::CheckpointRecord;

/// The consumed surface of the object-blob store collaborator.
///
/// Writes are unconditional full overwrites with no ETag precondition. If an
/// external checkpoint writer (the consumer framework itself) mutates the
/// same blob between this system's read and write, that writer's change is
/// silently lost. That lost-update hazard is inherited behavior; an adapter
/// that adds a conditional-write precondition is changing semantics.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the full content of one blob.
    ///
    /// Fails with [`RecordNotFound`](crate::error::CorrectionError::RecordNotFound)
    /// when no blob exists at that name, or
    /// [`StoreUnavailable`](crate::error::CorrectionError::StoreUnavailable)
    /// on transport/auth failure.
    async fn read_blob(&self, container: &str, blob_name: &str) -> Result<Vec<u8>>;

    /// Overwrite the full content of one blob.
    async fn write_blob(&self, container: &str, blob_name: &str, content: Vec<u8>) -> Result<()>;
}

/// Accessor scoped to one stream's checkpoint container.
///
/// The container path is a stable external contract shared with the consumer
/// framework: `{prefix}/{stream_host}/{stream_path}/{consumer_group}`, with
/// the partition id as the blob name.
#[derive(Clone)]
pub struct CheckpointStoreAccessor {
    store: Arc<dyn BlobStore>,
    container: String,
}

impl CheckpointStoreAccessor {
    /// Default container prefix used by the consumer framework.
    pub const DEFAULT_CONTAINER_PREFIX: &'static str = "azure-webjobs-eventhub";

    pub fn new(store: Arc<dyn BlobStore>, container: String) -> Self {
        Self { store, container }
    }

    /// Build an accessor from the container path components.
    pub fn for_stream(
        store: Arc<dyn BlobStore>,
        prefix: &str,
        stream_host: &str,
        stream_path: &str,
        consumer_group: &str,
    ) -> Self {
        let container = format!("{prefix}/{stream_host}/{stream_path}/{consumer_group}");
        Self::new(store, container)
    }

    /// The derived container path this accessor is scoped to.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Read and decode the current checkpoint record for one partition.
    pub async fn read_current(&self, partition_id: &str) -> Result<CheckpointRecord> {
        let bytes = self.store.read_blob(&self.container, partition_id).await?;
        let record = CheckpointRecord::decode(partition_id, &bytes)?;

        debug!(
            partition_id = %partition_id,
            container = %self.container,
            offset = %record.offset,
            sequence_number = %record.sequence_number,
            "Read checkpoint record"
        );
        Ok(record)
    }

    /// Encode and overwrite one partition's checkpoint record.
    ///
    /// The blob name is the same partition lookup key the record was read
    /// under; the record's embedded partition id is pass-through content and
    /// may legitimately be empty in a permissively decoded record. Full
    /// replace, no optimistic concurrency check (see [`BlobStore`]).
    pub async fn write_updated(&self, partition_id: &str, record: &CheckpointRecord) -> Result<()> {
        let bytes = record.encode();
        self.store
            .write_blob(&self.container, partition_id, bytes)
            .await?;

        debug!(
            partition_id = %partition_id,
            container = %self.container,
            offset = %record.offset,
            sequence_number = %record.sequence_number,
            "Wrote updated checkpoint record"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CorrectionError;
    use crate::test_support::InMemoryBlobStore;

    fn accessor(store: Arc<InMemoryBlobStore>) -> CheckpointStoreAccessor {
        CheckpointStoreAccessor::for_stream(
            store,
            CheckpointStoreAccessor::DEFAULT_CONTAINER_PREFIX,
            "hub.example.net",
            "telemetry",
            "$Default",
        )
    }

    #[test]
    fn test_container_path_derivation() {
        let store = Arc::new(InMemoryBlobStore::new());
        let accessor = accessor(store);
        assert_eq!(
            accessor.container(),
            "azure-webjobs-eventhub/hub.example.net/telemetry/$Default"
        );
    }

    #[tokio::test]
    async fn test_read_current_decodes_stored_record() {
        let store = Arc::new(InMemoryBlobStore::new());
        let accessor = accessor(store.clone());
        store.put(
            accessor.container(),
            "0",
            br#"{"Offset":"100","SequenceNumber":"50","PartitionId":"0","Owner":"workerA","Token":"t1","Epoch":"3"}"#.to_vec(),
        );

        let record = accessor.read_current("0").await.expect("Should read");
        assert_eq!(record.offset, "100");
        assert_eq!(record.sequence_number, "50");
        assert_eq!(record.owner, "workerA");
    }

    #[tokio::test]
    async fn test_read_current_missing_blob_is_record_not_found() {
        let store = Arc::new(InMemoryBlobStore::new());
        let accessor = accessor(store);

        let err = accessor.read_current("2").await.unwrap_err();
        assert!(matches!(err, CorrectionError::RecordNotFound { .. }));
        assert_eq!(err.partition_id(), Some("2"));
    }

    #[tokio::test]
    async fn test_read_current_garbage_is_malformed() {
        let store = Arc::new(InMemoryBlobStore::new());
        let accessor = accessor(store.clone());
        store.put(accessor.container(), "1", b"not a record".to_vec());

        let err = accessor.read_current("1").await.unwrap_err();
        assert!(matches!(err, CorrectionError::MalformedRecord { .. }));
    }

    #[tokio::test]
    async fn test_write_updated_overwrites_full_content() {
        let store = Arc::new(InMemoryBlobStore::new());
        let accessor = accessor(store.clone());
        store.put(accessor.container(), "0", b"old content".to_vec());

        let record = CheckpointRecord {
            offset: "250".to_string(),
            sequence_number: "120".to_string(),
            partition_id: "0".to_string(),
            owner: "workerA".to_string(),
            token: "t1".to_string(),
            epoch: "3".to_string(),
        };
        accessor
            .write_updated("0", &record)
            .await
            .expect("Should write");

        let stored = store.get(accessor.container(), "0").expect("Blob present");
        let round_trip = CheckpointRecord::decode("0", &stored).unwrap();
        assert_eq!(round_trip, record);
    }

    #[tokio::test]
    async fn test_write_updated_uses_lookup_key_not_embedded_partition_id() {
        let store = Arc::new(InMemoryBlobStore::new());
        let accessor = accessor(store.clone());
        // Permissively decoded records may carry an empty partition id
        store.put(accessor.container(), "0", br#"{"Offset":"100"}"#.to_vec());

        let mut record = accessor.read_current("0").await.expect("Should read");
        assert_eq!(record.partition_id, "");

        record.offset = "250".to_string();
        accessor
            .write_updated("0", &record)
            .await
            .expect("Should write");

        let stored = store.get(accessor.container(), "0").expect("Blob present");
        assert_eq!(CheckpointRecord::decode("0", &stored).unwrap().offset, "250");
        assert!(store.get(accessor.container(), "").is_none());
    }
}
