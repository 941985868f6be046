//! Cache layer over the durable store.
//!
//! Two independent contracts: a read-through cache for remote content and a
//! write-back cache for user-authored drafts, plus the generic synced-data
//! collection. Staleness is enforced only by the explicit maintenance pass,
//! never synchronously on reads.

use crate::error::SyncResult;
use outpost_store::OfflineStore;
use outpost_types::{CacheEntry, DataRecord, DraftEntry, Timestamp};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default staleness horizon for the maintenance pass.
pub const DEFAULT_EVICT_HORIZON: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Read-through and write-back caching over the durable store.
pub struct CacheLayer {
    store: Arc<dyn OfflineStore>,
}

impl CacheLayer {
    pub(crate) fn new(store: Arc<dyn OfflineStore>) -> Self {
        Self { store }
    }

    // ── Read-through content cache ───────────────────────────────

    /// Caches a content snapshot under `key`.
    pub async fn content_put(&self, key: &str, content: &str) -> SyncResult<()> {
        self.store.put_content(&CacheEntry::new(key, content)).await?;
        Ok(())
    }

    /// Returns cached content, refreshing its touch time on the way out.
    pub async fn content_get(&self, key: &str) -> SyncResult<Option<String>> {
        match self.store.get_content(key).await? {
            Some(entry) => {
                let entry = entry.touched();
                self.store.put_content(&entry).await?;
                Ok(Some(entry.content))
            }
            None => Ok(None),
        }
    }

    // ── Write-back draft cache ───────────────────────────────────

    /// Persists a draft buffer as unsynced.
    pub async fn draft_put(&self, key: &str, content: &str) -> SyncResult<()> {
        self.store.put_draft(&DraftEntry::new(key, content)).await?;
        Ok(())
    }

    /// Returns the draft buffer under `key`, if any.
    pub async fn draft_get(&self, key: &str) -> SyncResult<Option<String>> {
        Ok(self.store.get_draft(key).await?.map(|d| d.content))
    }

    /// Lists drafts not yet confirmed persisted remotely.
    ///
    /// After an unclean shutdown an entry here may have no matching pending
    /// action; callers re-issue the save for anything they find.
    pub async fn unsynced_drafts(&self) -> SyncResult<Vec<DraftEntry>> {
        let mut drafts = self.store.all_drafts().await?;
        drafts.retain(|d| !d.synced);
        Ok(drafts)
    }

    // ── Generic offline-synced data ──────────────────────────────

    /// Stores a generic data record as unsynced.
    pub async fn data_put(&self, key: &str, data: serde_json::Value) -> SyncResult<()> {
        self.store.put_data(&DataRecord::new(key, data)).await?;
        Ok(())
    }

    /// Returns the data value under `key`, if any.
    pub async fn data_get(&self, key: &str) -> SyncResult<Option<serde_json::Value>> {
        Ok(self.store.get_data(key).await?.map(|r| r.data))
    }

    // ── Maintenance ──────────────────────────────────────────────

    /// Deletes content entries older than `horizon` and synced drafts older
    /// than `horizon`. Unsynced drafts are never evicted. Returns the number
    /// of records removed.
    pub async fn evict_stale(&self, horizon: Duration) -> SyncResult<usize> {
        let reference = Timestamp::now();
        let mut evicted = 0usize;

        for entry in self.store.all_content().await? {
            if entry.touched_at.is_older_than(horizon, reference) {
                self.store.delete_content(&entry.key).await?;
                evicted += 1;
            }
        }

        for draft in self.store.all_drafts().await? {
            if draft.synced && draft.touched_at.is_older_than(horizon, reference) {
                self.store.delete_draft(&draft.key).await?;
                evicted += 1;
            }
        }

        if evicted > 0 {
            debug!(evicted, "evicted stale cache records");
        }
        Ok(evicted)
    }
}
