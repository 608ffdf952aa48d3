use std::io::Write;
use std::sync::Arc;

use store_client::StorageClient;

use crate::configurations::LoadTestConfig;
use crate::errors::{LoadTestError, Result};
use crate::event_pipeline::{EventLogger, EventPipeline, Severity};
use crate::object_uploader::{CompletedObject, ObjectUploader};
use crate::payload::random_payload;

/// The outcome of one object creation request. Tagged rather than nullable,
/// so callers cannot forget the failure case; a failed object is still a
/// slot in the result list.
#[derive(Debug)]
pub enum ObjectOutcome {
    Completed(CompletedObject),
    Failed(LoadTestError),
}

impl ObjectOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ObjectOutcome::Completed(_))
    }

    pub fn completed(&self) -> Option<&CompletedObject> {
        match self {
            ObjectOutcome::Completed(object) => Some(object),
            ObjectOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&LoadTestError> {
        match self {
            ObjectOutcome::Completed(_) => None,
            ObjectOutcome::Failed(e) => Some(e),
        }
    }
}

/// Iterates object creation requests strictly sequentially; only parts
/// within one object run in parallel.
pub struct BatchDriver {
    config: LoadTestConfig,
    client: Arc<dyn StorageClient>,
}

impl BatchDriver {
    pub fn new(config: LoadTestConfig, client: Arc<dyn StorageClient>) -> Self {
        Self { config, client }
    }

    /// Runs the whole batch. Per-object failures are absorbed into their
    /// outcome slot and logged once at error severity; they never abort the
    /// batch or leak into other objects. The returned list always has
    /// exactly `object_count` entries, in submission order.
    pub async fn run(&self, logger: &EventLogger) -> Result<Vec<ObjectOutcome>> {
        self.config.validate()?;

        let uploader = ObjectUploader::new(
            self.config.endpoint.bucket_name.clone(),
            self.config.key_prefix.clone(),
            self.config.part_count,
            self.client.clone(),
            logger.clone(),
        );

        let mut outcomes = Vec::with_capacity(self.config.object_count);
        for _ in 0..self.config.object_count {
            let payload = random_payload(self.config.object_size);
            match uploader.upload_object(payload).await {
                Ok(object) => outcomes.push(ObjectOutcome::Completed(object)),
                Err(e) => {
                    logger
                        .emit(Severity::Error, format!("Error creating object: {e}"))
                        .await;
                    outcomes.push(ObjectOutcome::Failed(e));
                },
            }
        }

        Ok(outcomes)
    }
}

/// Prints backend metadata for every completed object, skipping failed ones
/// silently (their error already went through the pipeline).
pub fn print_summary(outcomes: &[ObjectOutcome], out: &mut dyn Write) -> std::io::Result<()> {
    for object in outcomes.iter().filter_map(ObjectOutcome::completed) {
        writeln!(out, "HTTP Status Code: {}", object.metadata.status_code)?;
        writeln!(out, "Request ID: {}", object.metadata.request_id)?;
        writeln!(out, "Host ID: {}", object.metadata.host_id)?;
    }
    Ok(())
}

/// Composition point for one full run: spawn the event pipeline, drive the
/// batch, drain the pipeline, then print the summary. The `shutdown` await
/// is what guarantees every log line reaches the file before the first
/// summary line prints.
pub async fn run_load_test(
    config: LoadTestConfig,
    client: Arc<dyn StorageClient>,
    out: &mut dyn Write,
) -> Result<Vec<ObjectOutcome>> {
    config.validate()?;

    let pipeline = EventPipeline::spawn(&config.log_file, config.min_severity)?;
    let log_path = pipeline.log_path().to_path_buf();
    let logger = pipeline.logger();

    let driver = BatchDriver::new(config, client);
    let outcomes = driver.run(&logger).await?;

    drop(logger);
    pipeline.shutdown().await?;

    print_summary(&outcomes, out)?;
    writeln!(out, "Logs have been written to {}", log_path.display())?;
    writeln!(out, "Test completed.")?;

    Ok(outcomes)
}
