//! Core type definitions for Outpost.
//!
//! This crate defines the fundamental types shared by the offline engine:
//! - Action identifiers (UUID v7)
//! - Monotonic millisecond timestamps
//! - Queued offline actions and the closed set of replayable kinds
//! - Cached record shapes (read-through, write-back, generic synced data)
//! - Connectivity state
//!
//! Everything domain-specific (what a payload means, which remote endpoint
//! an action targets) belongs to the replay backend, not here.

mod action;
mod ids;
mod record;
mod state;
mod timestamp;

pub use action::{ActionKind, OfflineAction};
pub use ids::ActionId;
pub use record::{CacheEntry, DataRecord, DraftEntry};
pub use state::ConnectivityState;
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("unknown action kind: {0}")]
    UnknownActionKind(String),
}
