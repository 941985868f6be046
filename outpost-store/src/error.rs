//! Error types for the durable store.

use thiserror::Error;

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in store operations.
///
/// These are fatal to the operation in progress and propagate to whichever
/// caller issued it; nothing in this layer retries.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Corrupt or unparseable row data.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A blocking storage task failed to complete.
    #[error("background task failed: {0}")]
    Background(String),
}
