//! Error types for the AssemblyAI client.

use crate::client::JobStatus;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Client error variants.
#[derive(Debug, Error)]
pub enum Error {
    /// API key cannot be sent as an HTTP header
    #[error("api key is not a valid header value")]
    InvalidApiKey,

    /// Transport-level failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Non-success response from the service
    #[error("assemblyai returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// Job reached the terminal `error` status
    #[error("transcription job {id} failed: {message}")]
    Job { id: String, message: String },

    /// Poll deadline elapsed before the job reached a terminal status
    #[error("transcription job {id} still {status} after {waited:?}")]
    Timeout {
        id: String,
        status: JobStatus,
        waited: Duration,
    },

    /// Malformed response body
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Local file access failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for scriba-api operations.
pub type Result<T> = std::result::Result<T, Error>;
