//! Storage-specific error type wrapping IO and JSON errors.

use lighthub_domain::error::HubError;

/// Errors originating from the JSON file storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading, writing or renaming the data file failed.
    #[error("io error")]
    Io(#[from] std::io::Error),

    /// The data file does not hold valid runtime data.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for HubError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
