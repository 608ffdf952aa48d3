use anyhow::anyhow;
use store_client::StorageClientError;
use thiserror::Error;
use tokio::task::JoinError;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LoadTestError {
    #[error("Configuration Error: {0}")]
    ConfigurationError(String),

    #[error("Session Init Error: {0}")]
    SessionInitError(StorageClientError),

    #[error("Part Upload Error: {0}")]
    PartUploadError(StorageClientError),

    #[error("Completion Error: {0}")]
    CompletionError(StorageClientError),

    #[error("Upload task error: {0}")]
    UploadTaskError(String),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Other Internal Error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LoadTestError>;

impl PartialEq for LoadTestError {
    fn eq(&self, other: &LoadTestError) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl From<JoinError> for LoadTestError {
    fn from(value: JoinError) -> Self {
        LoadTestError::InternalError(anyhow!("{value:?}"))
    }
}

impl From<serde_json::Error> for LoadTestError {
    fn from(value: serde_json::Error) -> Self {
        LoadTestError::ConfigurationError(format!("Error reading JSON: {value}"))
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for LoadTestError {
    fn from(value: tokio::sync::mpsc::error::SendError<T>) -> Self {
        LoadTestError::InternalError(anyhow!("{value:?}"))
    }
}
