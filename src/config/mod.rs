//! # Corrector Configuration
//!
//! Process configuration for a correction run: stream endpoint and
//! credentials, checkpoint-store addressing, and receive tuning. Loaded once
//! at startup from an optional YAML file layered with environment-variable
//! overrides (see [`loader`]). Defaults mirror the consumer framework's
//! conventions so a minimal config only has to name the stream and the store.

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::error::{CorrectionError, Result};

/// Root configuration for a correction run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct CorrectorConfig {
    /// Event stream endpoint and credentials
    #[serde(default)]
    pub stream: StreamConfig,

    /// Checkpoint blob store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Live receive tuning
    #[serde(default)]
    pub receive: ReceiveConfig,
}

/// Target event stream and shared-access credential.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StreamConfig {
    /// Stream endpoint hostname, e.g. `myhub.servicebus.windows.net`
    #[serde(default)]
    pub hostname: String,

    /// Stream path/name within the endpoint
    #[serde(default)]
    pub path: String,

    /// Shared-access key name
    #[serde(default = "StreamConfig::default_sas_key_name")]
    pub sas_key_name: String,

    /// Shared-access key value
    #[serde(default)]
    pub sas_key: String,

    /// Consumer group whose checkpoints are being corrected
    #[serde(default = "StreamConfig::default_consumer_group")]
    pub consumer_group: String,
}

impl StreamConfig {
    fn default_sas_key_name() -> String {
        "service".to_string()
    }

    fn default_consumer_group() -> String {
        "$Default".to_string()
    }

    /// Full endpoint URI for the stream transport.
    pub fn endpoint(&self) -> String {
        format!("sb://{}", self.hostname)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            path: String::new(),
            sas_key_name: Self::default_sas_key_name(),
            sas_key: String::new(),
            consumer_group: Self::default_consumer_group(),
        }
    }
}

/// Checkpoint blob store connection and addressing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Blob store connection string
    #[serde(default)]
    pub connection_string: String,

    /// First segment of the checkpoint container path
    #[serde(default = "StoreConfig::default_container_prefix")]
    pub container_prefix: String,
}

impl StoreConfig {
    fn default_container_prefix() -> String {
        crate::checkpoint::CheckpointStoreAccessor::DEFAULT_CONTAINER_PREFIX.to_string()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            container_prefix: Self::default_container_prefix(),
        }
    }
}

/// Live receive tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReceiveConfig {
    /// Upper bound on events per receive call
    #[serde(default = "ReceiveConfig::default_batch_size")]
    pub batch_size: usize,
}

impl ReceiveConfig {
    fn default_batch_size() -> usize {
        100
    }
}

impl Default for ReceiveConfig {
    fn default() -> Self {
        Self {
            batch_size: Self::default_batch_size(),
        }
    }
}

impl CorrectorConfig {
    /// Validate that the run can be addressed: the stream, its consumer group
    /// and the batch bound must all be present.
    pub fn validate(&self) -> Result<()> {
        if self.stream.hostname.is_empty() {
            return Err(CorrectionError::configuration(
                "stream.hostname must not be empty",
            ));
        }
        if self.stream.path.is_empty() {
            return Err(CorrectionError::configuration(
                "stream.path must not be empty",
            ));
        }
        if self.stream.consumer_group.is_empty() {
            return Err(CorrectionError::configuration(
                "stream.consumer_group must not be empty",
            ));
        }
        if self.receive.batch_size == 0 {
            return Err(CorrectionError::configuration(
                "receive.batch_size must be at least 1",
            ));
        }
        Ok(())
    }

    /// Container path of the checkpoint blobs this run will rewrite.
    pub fn container_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.store.container_prefix,
            self.stream.hostname,
            self.stream.path,
            self.stream.consumer_group
        )
    }
}
