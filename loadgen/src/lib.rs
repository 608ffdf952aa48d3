#![cfg_attr(feature = "strict", deny(warnings))]

pub use batch_driver::{print_summary, run_load_test, BatchDriver, ObjectOutcome};
pub use configurations::{LoadTestConfig, StorageEndpointConfig};
pub use errors::{LoadTestError, Result};
pub use event_pipeline::{EventLogger, EventPipeline, LogEvent, Severity};
pub use object_uploader::{CompletedObject, ObjectUploader};
pub use part_splitter::split_into_parts;
pub use payload::random_payload;

mod batch_driver;
mod configurations;
pub mod constants;
mod errors;
mod event_pipeline;
mod object_uploader;
mod part_splitter;
mod payload;
