//! Error types for scriba-core organized by subsystem.

use thiserror::Error;

/// Core error variants organized by subsystem.
#[derive(Debug, Error)]
pub enum Error {
    /// Export rendering error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// History store error
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Export rendering errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Transcript could not be serialized
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// History store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No platform data directory to root the store in
    #[error("no data directory available on this platform")]
    DataDirUnavailable,

    /// Requested id has no stored transcript body
    #[error("transcript not found in history: {0}")]
    NotFound(String),

    /// IO error while touching the store
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Stored transcript body failed to parse
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for scriba-core operations.
pub type Result<T> = std::result::Result<T, Error>;

// Nested From implementations for automatic error conversion chains

// std::io::Error → StoreError → Error
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Store(StoreError::Io(e))
    }
}
