use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::errors::Result;

/// Severity of one log event. Ordered, so thresholds compare naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Severity {
    type Err = std::io::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid log level, should be one of DEBUG, INFO, WARNING, ERROR, CRITICAL: {s}"),
            )),
        }
    }
}

/// One status message from an orchestrator or the batch driver. Consumed
/// exactly once by the pipeline's single consumer.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub severity: Severity,
    pub message: String,
}

/// Producer handle into the pipeline. Cheap to clone; any number of
/// orchestrators and workers may hold one.
#[derive(Clone)]
pub struct EventLogger {
    tx: mpsc::Sender<LogEvent>,
}

impl EventLogger {
    pub async fn emit(&self, severity: Severity, message: impl Into<String>) {
        // A closed channel means the pipeline was already shut down; events
        // arriving after that point are dropped rather than treated as errors.
        let _ = self
            .tx
            .send(LogEvent {
                severity,
                message: message.into(),
            })
            .await;
    }
}

/// Single-consumer, multi-producer log/print sink shared across all objects
/// in a run.
///
/// The consumer task drains events in arrival order, appending each one to
/// the log file (when its severity clears `min_severity`) and echoing to the
/// operator console when severity is `Info` or above. [`shutdown`] closes the
/// channel and waits for the consumer to finish, which is the guarantee that
/// every log line is flushed before the batch summary prints.
///
/// [`shutdown`]: EventPipeline::shutdown
pub struct EventPipeline {
    tx: mpsc::Sender<LogEvent>,
    consumer: JoinHandle<std::io::Result<u64>>,
    log_path: PathBuf,
}

impl EventPipeline {
    /// Opens (or creates) the log file and starts the consumer task.
    pub fn spawn(log_path: impl AsRef<Path>, min_severity: Severity) -> Result<Self> {
        let log_path = log_path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

        let (tx, mut rx) = mpsc::channel::<LogEvent>(EVENT_CHANNEL_CAPACITY);

        let consumer = tokio::spawn(async move {
            let mut writer = BufWriter::new(file);
            let mut lines_written = 0u64;

            while let Some(event) = rx.recv().await {
                if event.severity >= min_severity {
                    writeln!(writer, "{}: {}", event.severity, event.message)?;
                    lines_written += 1;
                }
                if event.severity >= Severity::Info {
                    println!("LOG ({}): {}", event.severity, event.message);
                }
            }

            writer.flush()?;
            Ok(lines_written)
        });

        Ok(Self { tx, consumer, log_path })
    }

    pub fn logger(&self) -> EventLogger {
        EventLogger { tx: self.tx.clone() }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Closes the channel and blocks until the consumer has drained every
    /// queued event. Returns the number of lines written to the log file.
    ///
    /// Outstanding [`EventLogger`] clones keep the channel open; drop them
    /// before calling this or the drain will wait on them.
    pub async fn shutdown(self) -> Result<u64> {
        let EventPipeline { tx, consumer, .. } = self;
        drop(tx);
        let lines_written = consumer.await??;
        Ok(lines_written)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn test_events_drain_in_fifo_order() {
        let tmp_dir = TempDir::new().unwrap();
        let log_path = tmp_dir.path().join("upload.log");

        let pipeline = EventPipeline::spawn(&log_path, Severity::Debug).unwrap();
        let logger = pipeline.logger();

        for i in 0..100 {
            logger.emit(Severity::Info, format!("event {i}")).await;
        }
        drop(logger);

        let lines_written = pipeline.shutdown().await.unwrap();
        assert_eq!(lines_written, 100);

        let lines = read_lines(&log_path);
        assert_eq!(lines.len(), 100);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line, &format!("INFO: event {i}"));
        }
    }

    #[tokio::test]
    async fn test_min_severity_filters_file_output() {
        let tmp_dir = TempDir::new().unwrap();
        let log_path = tmp_dir.path().join("upload.log");

        let pipeline = EventPipeline::spawn(&log_path, Severity::Warning).unwrap();
        let logger = pipeline.logger();

        logger.emit(Severity::Debug, "dropped").await;
        logger.emit(Severity::Info, "dropped too").await;
        logger.emit(Severity::Warning, "kept").await;
        logger.emit(Severity::Error, "kept as well").await;
        drop(logger);

        let lines_written = pipeline.shutdown().await.unwrap();
        assert_eq!(lines_written, 2);

        let lines = read_lines(&log_path);
        assert_eq!(lines, vec!["WARNING: kept", "ERROR: kept as well"]);
    }

    #[tokio::test]
    async fn test_concurrent_producers_all_drained() {
        let tmp_dir = TempDir::new().unwrap();
        let log_path = tmp_dir.path().join("upload.log");

        let pipeline = EventPipeline::spawn(&log_path, Severity::Debug).unwrap();

        let mut handles = Vec::new();
        for p in 0..8 {
            let logger = pipeline.logger();
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    logger.emit(Severity::Debug, format!("producer {p} event {i}")).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let lines_written = pipeline.shutdown().await.unwrap();
        assert_eq!(lines_written, 8 * 50);
        assert_eq!(read_lines(&log_path).len(), 8 * 50);
    }

    #[test]
    fn test_severity_parsing_and_ordering() {
        assert_eq!("debug".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("verbose".parse::<Severity>().is_err());

        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }
}
