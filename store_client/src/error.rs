use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StorageClientError {
    #[error("Configuration Error: {0}")]
    ConfigurationError(String),

    #[error("Invalid Arguments")]
    InvalidArguments,

    #[error("Upload session not found: {0}")]
    UploadSessionNotFound(String),

    #[error("Part numbers at completion must be ascending and gapless: {0}")]
    PartOrderViolation(String),

    #[error("Part {0} was never uploaded for this session")]
    PartNotFound(u32),

    #[error("ETag mismatch for part {0}")]
    EtagMismatch(u32),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Other Internal Error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Error: {0}")]
    Other(String),
}

// Define our own result type here (this seems to be the standard).
pub type Result<T> = std::result::Result<T, StorageClientError>;

impl PartialEq for StorageClientError {
    fn eq(&self, other: &StorageClientError) -> bool {
        match (self, other) {
            (StorageClientError::PartNotFound(a), StorageClientError::PartNotFound(b)) => a == b,
            (e1, e2) => std::mem::discriminant(e1) == std::mem::discriminant(e2),
        }
    }
}
