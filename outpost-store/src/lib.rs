//! Durable store for the Outpost offline engine.
//!
//! Crash-safe, transactional storage for the four record collections the
//! engine relies on:
//!
//! - pending actions (the offline outbox)
//! - generic offline-synced data
//! - read-through content cache
//! - write-back draft cache
//!
//! # Architecture
//!
//! - The [`OfflineStore`] trait abstracts the backend so the same engine
//!   logic runs against SQLite on disk, SQLite in memory, or a plain
//!   in-memory map in tests.
//! - Each operation is single-record atomic. There is no cross-collection
//!   transaction guarantee; the engine tolerates the narrow window this
//!   creates instead of paying for two-phase commit.
//! - `put_*` is an upsert: it never fails on key collision, only on
//!   underlying I/O failure.

mod error;
mod memory;
mod sqlite;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use outpost_types::{ActionId, CacheEntry, DataRecord, DraftEntry, OfflineAction};

/// Transactional storage over the engine's four record collections.
///
/// `all_*` scans return unordered results; callers sort. Operations may
/// suspend on I/O but are not re-entrant per record: two concurrent `put`s
/// for the same key must be sequenced by the caller.
#[async_trait]
pub trait OfflineStore: Send + Sync {
    // ── Pending actions ──────────────────────────────────────────

    /// Upserts a pending action by id.
    async fn put_action(&self, action: &OfflineAction) -> StorageResult<()>;

    /// Looks up a pending action by id.
    async fn get_action(&self, id: &ActionId) -> StorageResult<Option<OfflineAction>>;

    /// Returns every pending action, unordered.
    async fn all_actions(&self) -> StorageResult<Vec<OfflineAction>>;

    /// Deletes a pending action. Deleting an absent id is not an error.
    async fn delete_action(&self, id: &ActionId) -> StorageResult<()>;

    // ── Generic offline-synced data ──────────────────────────────

    /// Upserts a data record by key.
    async fn put_data(&self, record: &DataRecord) -> StorageResult<()>;

    /// Looks up a data record by key.
    async fn get_data(&self, key: &str) -> StorageResult<Option<DataRecord>>;

    /// Returns every data record, unordered.
    async fn all_data(&self) -> StorageResult<Vec<DataRecord>>;

    /// Deletes a data record.
    async fn delete_data(&self, key: &str) -> StorageResult<()>;

    // ── Read-through content cache ───────────────────────────────

    /// Upserts a content entry by key.
    async fn put_content(&self, entry: &CacheEntry) -> StorageResult<()>;

    /// Looks up a content entry by key.
    async fn get_content(&self, key: &str) -> StorageResult<Option<CacheEntry>>;

    /// Returns every content entry, unordered.
    async fn all_content(&self) -> StorageResult<Vec<CacheEntry>>;

    /// Deletes a content entry.
    async fn delete_content(&self, key: &str) -> StorageResult<()>;

    // ── Write-back draft cache ───────────────────────────────────

    /// Upserts a draft entry by key.
    async fn put_draft(&self, entry: &DraftEntry) -> StorageResult<()>;

    /// Looks up a draft entry by key.
    async fn get_draft(&self, key: &str) -> StorageResult<Option<DraftEntry>>;

    /// Returns every draft entry, unordered.
    async fn all_drafts(&self) -> StorageResult<Vec<DraftEntry>>;

    /// Deletes a draft entry.
    async fn delete_draft(&self, key: &str) -> StorageResult<()>;

    /// Flips a draft's `synced` flag to true. Missing keys are ignored;
    /// the draft may have been deleted or rewritten since the action was
    /// queued.
    async fn mark_draft_synced(&self, key: &str) -> StorageResult<()>;
}
