/// Default log file, matching what operators expect from earlier versions of
/// this tool.
pub const DEFAULT_LOG_FILENAME: &str = "s3_upload.log";

/// Capacity of the event pipeline channel. Producers only block if the
/// consumer falls this many events behind.
pub const EVENT_CHANNEL_CAPACITY: usize = 4096;
