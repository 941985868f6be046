//! In-memory implementation of the durable store.
//!
//! Backs the same trait as [`crate::SqliteStore`] with plain hash maps.
//! Nothing here survives the process; it exists for tests and as proof the
//! engine logic is backend-agnostic.

use crate::{OfflineStore, StorageResult};
use async_trait::async_trait;
use outpost_types::{ActionId, CacheEntry, DataRecord, DraftEntry, OfflineAction};
use std::collections::HashMap;
use std::sync::Mutex;

/// Volatile store backed by hash maps.
#[derive(Default)]
pub struct MemoryStore {
    actions: Mutex<HashMap<ActionId, OfflineAction>>,
    data: Mutex<HashMap<String, DataRecord>>,
    content: Mutex<HashMap<String, CacheEntry>>,
    drafts: Mutex<HashMap<String, DraftEntry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfflineStore for MemoryStore {
    async fn put_action(&self, action: &OfflineAction) -> StorageResult<()> {
        self.actions.lock().unwrap().insert(action.id, action.clone());
        Ok(())
    }

    async fn get_action(&self, id: &ActionId) -> StorageResult<Option<OfflineAction>> {
        Ok(self.actions.lock().unwrap().get(id).cloned())
    }

    async fn all_actions(&self) -> StorageResult<Vec<OfflineAction>> {
        Ok(self.actions.lock().unwrap().values().cloned().collect())
    }

    async fn delete_action(&self, id: &ActionId) -> StorageResult<()> {
        self.actions.lock().unwrap().remove(id);
        Ok(())
    }

    async fn put_data(&self, record: &DataRecord) -> StorageResult<()> {
        self.data.lock().unwrap().insert(record.key.clone(), record.clone());
        Ok(())
    }

    async fn get_data(&self, key: &str) -> StorageResult<Option<DataRecord>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn all_data(&self) -> StorageResult<Vec<DataRecord>> {
        Ok(self.data.lock().unwrap().values().cloned().collect())
    }

    async fn delete_data(&self, key: &str) -> StorageResult<()> {
        self.data.lock().unwrap().remove(key);
        Ok(())
    }

    async fn put_content(&self, entry: &CacheEntry) -> StorageResult<()> {
        self.content.lock().unwrap().insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    async fn get_content(&self, key: &str) -> StorageResult<Option<CacheEntry>> {
        Ok(self.content.lock().unwrap().get(key).cloned())
    }

    async fn all_content(&self) -> StorageResult<Vec<CacheEntry>> {
        Ok(self.content.lock().unwrap().values().cloned().collect())
    }

    async fn delete_content(&self, key: &str) -> StorageResult<()> {
        self.content.lock().unwrap().remove(key);
        Ok(())
    }

    async fn put_draft(&self, entry: &DraftEntry) -> StorageResult<()> {
        self.drafts.lock().unwrap().insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    async fn get_draft(&self, key: &str) -> StorageResult<Option<DraftEntry>> {
        Ok(self.drafts.lock().unwrap().get(key).cloned())
    }

    async fn all_drafts(&self) -> StorageResult<Vec<DraftEntry>> {
        Ok(self.drafts.lock().unwrap().values().cloned().collect())
    }

    async fn delete_draft(&self, key: &str) -> StorageResult<()> {
        self.drafts.lock().unwrap().remove(key);
        Ok(())
    }

    async fn mark_draft_synced(&self, key: &str) -> StorageResult<()> {
        if let Some(entry) = self.drafts.lock().unwrap().get_mut(key) {
            entry.synced = true;
        }
        Ok(())
    }
}
