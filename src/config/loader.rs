//! Configuration Loader
//!
//! Layered configuration loading: an optional YAML file (path from
//! `CORRECTOR_CONFIG_PATH`, default `config/corrector.yaml`) provides the
//! base, then environment variables override individual values. A missing
//! file is not an error; validation of the merged result is the caller's
//! gate.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CorrectionError, Result};

use super::CorrectorConfig;

/// Default config file path relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "config/corrector.yaml";

impl CorrectorConfig {
    /// Load configuration: YAML file (if present) plus env-var overrides.
    pub fn load() -> Result<Self> {
        let path = env::var("CORRECTOR_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::from_yaml_file(&path)?
        } else {
            debug!(
                path = %path.display(),
                "No configuration file found, starting from defaults"
            );
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CorrectionError::configuration(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: CorrectorConfig = serde_yaml::from_str(&content).map_err(|e| {
            CorrectionError::configuration(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;

        debug!(path = %path.display(), "Configuration file loaded");
        Ok(config)
    }

    /// Apply environment-variable overrides for every scalar setting.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(hostname) = env::var("CORRECTOR_STREAM_HOSTNAME") {
            self.stream.hostname = hostname;
        }
        if let Ok(path) = env::var("CORRECTOR_STREAM_PATH") {
            self.stream.path = path;
        }
        if let Ok(key_name) = env::var("CORRECTOR_STREAM_SAS_KEY_NAME") {
            self.stream.sas_key_name = key_name;
        }
        if let Ok(key) = env::var("CORRECTOR_STREAM_SAS_KEY") {
            self.stream.sas_key = key;
        }
        if let Ok(group) = env::var("CORRECTOR_STREAM_CONSUMER_GROUP") {
            self.stream.consumer_group = group;
        }
        if let Ok(connection_string) = env::var("CORRECTOR_STORE_CONNECTION_STRING") {
            self.store.connection_string = connection_string;
        }
        if let Ok(prefix) = env::var("CORRECTOR_STORE_CONTAINER_PREFIX") {
            self.store.container_prefix = prefix;
        }
        if let Ok(batch_size) = env::var("CORRECTOR_RECEIVE_BATCH_SIZE") {
            self.receive.batch_size = batch_size.parse().map_err(|e| {
                CorrectionError::configuration(format!("Invalid receive batch_size: {e}"))
            })?;
        }
        Ok(())
    }
}
