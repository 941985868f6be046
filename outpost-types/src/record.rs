//! Cached record shapes.
//!
//! Two cache flavors share a shape: the read-through content cache holds
//! copies of remotely-sourced, rarely-changing content; the write-back draft
//! cache holds user-authored buffers not yet confirmed persisted remotely.
//! A third, generic collection stores arbitrary synced key/value data.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// A read-through cache entry: a snapshot of remote content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Caller-chosen key (e.g. a lesson id).
    pub key: String,
    /// Last-known content snapshot.
    pub content: String,
    /// Last write or read; used only for staleness eviction.
    pub touched_at: Timestamp,
}

impl CacheEntry {
    /// Creates an entry touched now.
    #[must_use]
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
            touched_at: Timestamp::now(),
        }
    }

    /// Returns a copy with `touched_at` refreshed to now.
    #[must_use]
    pub fn touched(mut self) -> Self {
        self.touched_at = Timestamp::now();
        self
    }
}

/// A write-back cache entry: a locally-edited buffer pending sync.
///
/// `synced = false` means a matching pending "save-code" action exists or
/// very recently existed. The draft and the action are written separately,
/// so a crash between the two can leave an unsynced draft with no queued
/// action; callers detect that via the unsynced-drafts listing and re-issue
/// the save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEntry {
    /// Caller-chosen key (e.g. a composite editor-buffer key).
    pub key: String,
    /// The user-edited buffer.
    pub content: String,
    /// Last write; used only for staleness eviction of synced drafts.
    pub touched_at: Timestamp,
    /// True once the matching action has been replayed successfully.
    pub synced: bool,
}

impl DraftEntry {
    /// Creates an unsynced draft touched now.
    #[must_use]
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
            touched_at: Timestamp::now(),
            synced: false,
        }
    }
}

/// A generic offline-synced data record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Caller-chosen key.
    pub key: String,
    /// Arbitrary JSON payload.
    pub data: serde_json::Value,
    /// Last write.
    pub updated_at: Timestamp,
    /// Whether this record has been confirmed remotely.
    pub synced: bool,
}

impl DataRecord {
    /// Creates an unsynced record updated now.
    #[must_use]
    pub fn new(key: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            data,
            updated_at: Timestamp::now(),
            synced: false,
        }
    }
}
