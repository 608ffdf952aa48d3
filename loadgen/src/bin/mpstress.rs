use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use loadgen::constants::DEFAULT_LOG_FILENAME;
use loadgen::{run_load_test, LoadTestConfig, Severity, StorageEndpointConfig};
use store_client::LocalClient;
use tracing_subscriber::EnvFilter;

/// Synthetic multipart-upload load generator for object-storage backends.
///
/// Uploads `--object-count` objects of `--object-size` random bytes each,
/// split into `--part-count` concurrently uploaded parts, against a
/// disk-backed storage backend rooted at `--storage-dir`.
#[derive(Parser)]
#[command(name = "mpstress", version)]
struct MpStressCommand {
    /// JSON file holding bucket_name, s3_endpoint_url, aws_access_key_id and
    /// aws_secret_access_key. Replaces the four individual flags below.
    #[clap(long)]
    credentials_json: Option<PathBuf>,

    /// Target bucket name.
    #[clap(long)]
    bucket: Option<String>,

    /// Storage endpoint URL, e.g. http://example.com:443.
    #[clap(long)]
    endpoint_url: Option<String>,

    /// Access key id.
    #[clap(long)]
    access_key_id: Option<String>,

    /// Secret access key.
    #[clap(long)]
    secret_access_key: Option<String>,

    /// Size of each object in bytes.
    #[clap(long)]
    object_size: u64,

    /// Number of parts per multipart upload.
    #[clap(long)]
    part_count: u32,

    /// Number of objects to place.
    #[clap(long)]
    object_count: usize,

    /// Prefix for generated object keys.
    #[clap(long, default_value = "")]
    prefix: String,

    /// Minimum severity written to the log file:
    /// DEBUG, INFO, WARNING, ERROR or CRITICAL.
    #[clap(long, default_value = "INFO")]
    log_level: Severity,

    /// Log file the event pipeline appends to.
    #[clap(long, default_value = DEFAULT_LOG_FILENAME)]
    log_file: PathBuf,

    /// Root directory of the disk-backed storage backend.
    #[clap(long, default_value = "storage")]
    storage_dir: PathBuf,
}

impl MpStressCommand {
    fn resolve_endpoint(&self) -> Result<StorageEndpointConfig> {
        if let Some(path) = &self.credentials_json {
            return Ok(StorageEndpointConfig::from_json_file(path)?);
        }

        let required = |field: &Option<String>, flag: &str| {
            field
                .clone()
                .ok_or_else(|| anyhow!("--{flag} is required when --credentials-json is not given"))
        };

        Ok(StorageEndpointConfig {
            bucket_name: required(&self.bucket, "bucket")?,
            endpoint_url: required(&self.endpoint_url, "endpoint-url")?,
            access_key_id: required(&self.access_key_id, "access-key-id")?,
            secret_access_key: required(&self.secret_access_key, "secret-access-key")?,
        })
    }

    fn into_config(self) -> Result<(LoadTestConfig, PathBuf)> {
        let endpoint = self.resolve_endpoint()?;
        let config = LoadTestConfig {
            endpoint,
            object_size: self.object_size,
            part_count: self.part_count,
            object_count: self.object_count,
            key_prefix: self.prefix,
            log_file: self.log_file,
            min_severity: self.log_level,
        };
        Ok((config, self.storage_dir))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (config, storage_dir) = MpStressCommand::parse().into_config()?;
    let client = Arc::new(LocalClient::new(&storage_dir)?);

    let mut stdout = std::io::stdout();
    run_load_test(config, client, &mut stdout).await?;

    Ok(())
}
