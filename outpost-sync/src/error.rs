//! Error types for the sync layer.

use outpost_store::StorageError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
///
/// Storage errors propagate to whichever caller originated them. Replay
/// failures never appear here: they are consumed by the retry/abandonment
/// policy inside the drain loop and surface only as notices.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Durable store failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Network/transport setup error.
    #[error("network error: {0}")]
    Network(String),
}

/// A remote handler failure during replay.
///
/// The engine does not distinguish retryable from permanent failures; every
/// variant costs one retry credit.
#[derive(Debug, Clone, Error)]
pub enum ReplayError {
    /// The request never completed (connection drop, timeout, DNS).
    #[error("network error: {0}")]
    Network(String),

    /// The remote service answered with a non-success status.
    #[error("remote rejected with status {status}")]
    Rejected {
        /// HTTP-ish status code from the remote.
        status: u16,
    },
}
