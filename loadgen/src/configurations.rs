use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{LoadTestError, Result};
use crate::event_pipeline::Severity;

/// Where and how to reach the storage backend. Field renames match the key
/// names of the JSON credential files this tool has always accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEndpointConfig {
    pub bucket_name: String,
    #[serde(rename = "s3_endpoint_url")]
    pub endpoint_url: String,
    #[serde(rename = "aws_access_key_id")]
    pub access_key_id: String,
    #[serde(rename = "aws_secret_access_key")]
    pub secret_access_key: String,
}

impl StorageEndpointConfig {
    /// Loads bucket name, endpoint and credentials from a JSON file.
    ///
    /// This is the only error that may halt the whole run: it fires before
    /// any upload begins.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LoadTestError::ConfigurationError(format!("Error reading JSON: {e}")))?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Immutable configuration record for one load-test run. Resolved entirely
/// before the core begins; constructors take it by value and never mutate it.
#[derive(Debug, Clone)]
pub struct LoadTestConfig {
    pub endpoint: StorageEndpointConfig,

    /// Size of each object's payload in bytes.
    pub object_size: u64,

    /// Number of parts per multipart upload.
    pub part_count: u32,

    /// Number of objects to place, sequentially.
    pub object_count: usize,

    /// Prefix prepended to every generated object key.
    pub key_prefix: String,

    /// Append-only log sink for the event pipeline.
    pub log_file: PathBuf,

    /// Events below this severity are not written to the log file.
    pub min_severity: Severity,
}

impl LoadTestConfig {
    pub fn validate(&self) -> Result<()> {
        if self.part_count == 0 {
            return Err(LoadTestError::ConfigurationError(
                "part count must be positive".to_string(),
            ));
        }
        if self.endpoint.bucket_name.is_empty() {
            return Err(LoadTestError::ConfigurationError(
                "bucket name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
