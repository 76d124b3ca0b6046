//! # Checkpoint Record Codec
//!
//! The persisted checkpoint record and its JSON codec. The on-disk shape is
//! the consumer framework's own format (PascalCase field names, every field a
//! string), so decoding is permissive: missing fields default to empty
//! strings and unknown fields are ignored. Only content that is not valid
//! JSON for the record shape is rejected.

use serde::{Deserialize, Serialize};

use crate::error::{CorrectionError, Result};
use crate::stream::LiveEvent;

/// Persisted checkpoint for one partition.
///
/// `offset` and `sequence_number` are the only fields this system ever
/// rewrites. `owner`, `token` and `epoch` are lease metadata owned by the
/// consumer framework and must round-trip byte-identical through a
/// correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckpointRecord {
    /// Opaque stream-position token, not necessarily numeric.
    #[serde(default)]
    pub offset: String,

    /// Monotonically increasing sequence number, encoded as a string.
    #[serde(default)]
    pub sequence_number: String,

    /// Partition this record belongs to; also the blob name it is stored under.
    #[serde(default)]
    pub partition_id: String,

    /// Lease owner identity (pass-through).
    #[serde(default)]
    pub owner: String,

    /// Lease token (pass-through).
    #[serde(default)]
    pub token: String,

    /// Lease epoch (pass-through).
    #[serde(default)]
    pub epoch: String,
}

impl CheckpointRecord {
    /// Decode a record from its persisted byte content.
    ///
    /// The `partition_id` argument is used for error context only; the
    /// decoded record keeps whatever partition id the content carries.
    pub fn decode(partition_id: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| CorrectionError::malformed_record(partition_id, e.to_string()))
    }

    /// Encode the record for persistence. Total: a record is six plain
    /// string fields, serialization cannot fail.
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("checkpoint record serialization cannot fail")
    }

    /// Overwrite the stream position fields from an observed live event.
    ///
    /// Lease metadata and the partition id are untouched.
    pub fn apply_position(&mut self, event: &LiveEvent) {
        self.offset = event.offset.clone();
        self.sequence_number = event.sequence_number.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn sample_record() -> CheckpointRecord {
        CheckpointRecord {
            offset: "100".to_string(),
            sequence_number: "50".to_string(),
            partition_id: "0".to_string(),
            owner: "workerA".to_string(),
            token: "t1".to_string(),
            epoch: "3".to_string(),
        }
    }

    #[test]
    fn test_decode_full_record() {
        let json = r#"{
            "Offset": "100",
            "SequenceNumber": "50",
            "PartitionId": "0",
            "Owner": "workerA",
            "Token": "t1",
            "Epoch": "3"
        }"#;

        let record = CheckpointRecord::decode("0", json.as_bytes()).expect("Should decode");
        assert_eq!(record, sample_record());
    }

    #[test]
    fn test_decode_missing_fields_default_to_empty() {
        let json = r#"{"Offset": "42"}"#;
        let record = CheckpointRecord::decode("1", json.as_bytes()).expect("Should decode");

        assert_eq!(record.offset, "42");
        assert_eq!(record.sequence_number, "");
        assert_eq!(record.partition_id, "");
        assert_eq!(record.owner, "");
        assert_eq!(record.token, "");
        assert_eq!(record.epoch, "");
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let json = r#"{"Offset": "42", "LeaseDuration": "30"}"#;
        let record = CheckpointRecord::decode("1", json.as_bytes()).expect("Should decode");
        assert_eq!(record.offset, "42");
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let err = CheckpointRecord::decode("2", b"{not json").unwrap_err();
        assert!(matches!(err, CorrectionError::MalformedRecord { .. }));
        assert_eq!(err.partition_id(), Some("2"));
    }

    #[test]
    fn test_encode_uses_framework_field_names() {
        let bytes = sample_record().encode();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["Offset"], "100");
        assert_eq!(value["SequenceNumber"], "50");
        assert_eq!(value["PartitionId"], "0");
        assert_eq!(value["Owner"], "workerA");
        assert_eq!(value["Token"], "t1");
        assert_eq!(value["Epoch"], "3");
    }

    #[test]
    fn test_apply_position_touches_only_position_fields() {
        let mut record = sample_record();
        let event = LiveEvent {
            enqueued_at: Utc::now(),
            offset: "250".to_string(),
            sequence_number: "120".to_string(),
        };

        record.apply_position(&event);

        assert_eq!(record.offset, "250");
        assert_eq!(record.sequence_number, "120");
        assert_eq!(record.partition_id, "0");
        assert_eq!(record.owner, "workerA");
        assert_eq!(record.token, "t1");
        assert_eq!(record.epoch, "3");
    }

    proptest! {
        #[test]
        fn test_codec_round_trip(
            offset in ".*",
            sequence_number in ".*",
            partition_id in ".*",
            owner in ".*",
            token in ".*",
            epoch in ".*",
        ) {
            let record = CheckpointRecord {
                offset,
                sequence_number,
                partition_id,
                owner,
                token,
                epoch,
            };

            let bytes = record.encode();
            let decoded = CheckpointRecord::decode(&record.partition_id, &bytes).unwrap();
            prop_assert_eq!(decoded, record);
        }
    }
}
