//! Error types for the event store abstraction

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failure talking to the remote store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote store answered with a non-success status
    #[error("Backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        StorageError::Backend {
            status,
            message: message.into(),
        }
    }
}
