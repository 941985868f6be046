use outpost_store::{MemoryStore, OfflineStore};
use outpost_sync::backend::mock::ScriptedBackend;
use outpost_sync::{ManagerConfig, OfflineManager};
use outpost_types::{CacheEntry, DraftEntry, Timestamp};
use std::sync::Arc;

fn offline_manager() -> (OfflineManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let manager = OfflineManager::new(
        store.clone(),
        Arc::new(ScriptedBackend::always_ok()),
        ManagerConfig {
            start_online: false,
            ..Default::default()
        },
    );
    (manager, store)
}

// ── Read-through cache ───────────────────────────────────────────

#[tokio::test]
async fn cache_put_get_roundtrip() {
    let (manager, _store) = offline_manager();

    manager.cache_put("lesson-1", "# Intro").await.unwrap();
    assert_eq!(manager.cache_get("lesson-1").await.unwrap().unwrap(), "# Intro");
    assert!(manager.cache_get("lesson-2").await.unwrap().is_none());
}

#[tokio::test]
async fn cache_get_refreshes_touch_time() {
    let (manager, store) = offline_manager();

    manager.cache_put("lesson-1", "# Intro").await.unwrap();
    let before = store.get_content("lesson-1").await.unwrap().unwrap().touched_at;

    manager.cache_get("lesson-1").await.unwrap();
    let after = store.get_content("lesson-1").await.unwrap().unwrap().touched_at;
    assert!(after > before);
}

// ── Eviction ─────────────────────────────────────────────────────

#[tokio::test]
async fn evict_stale_removes_old_content_and_synced_drafts() {
    let (manager, store) = offline_manager();

    // Ancient entries, far past the default seven-day horizon.
    store
        .put_content(&CacheEntry {
            key: "old-lesson".into(),
            content: "stale".into(),
            touched_at: Timestamp::from_millis(1),
        })
        .await
        .unwrap();
    store
        .put_draft(&DraftEntry {
            key: "old-synced".into(),
            content: "done".into(),
            touched_at: Timestamp::from_millis(1),
            synced: true,
        })
        .await
        .unwrap();
    store
        .put_draft(&DraftEntry {
            key: "old-dirty".into(),
            content: "unsaved work".into(),
            touched_at: Timestamp::from_millis(1),
            synced: false,
        })
        .await
        .unwrap();

    // Fresh entries stay.
    manager.cache_put("fresh-lesson", "current").await.unwrap();

    let evicted = manager.evict_stale().await.unwrap();
    assert_eq!(evicted, 2);

    assert!(store.get_content("old-lesson").await.unwrap().is_none());
    assert!(store.get_draft("old-synced").await.unwrap().is_none());
    // Unsynced work is never evicted, no matter how old.
    assert!(store.get_draft("old-dirty").await.unwrap().is_some());
    assert!(store.get_content("fresh-lesson").await.unwrap().is_some());
}

#[tokio::test]
async fn evict_stale_on_fresh_store_removes_nothing() {
    let (manager, _store) = offline_manager();
    manager.cache_put("lesson-1", "body").await.unwrap();
    manager.save_local("buf", "code").await.unwrap();

    assert_eq!(manager.evict_stale().await.unwrap(), 0);
    assert!(manager.cache_get("lesson-1").await.unwrap().is_some());
    assert!(manager.get_local("buf").await.unwrap().is_some());
}

// ── Unsynced listing ─────────────────────────────────────────────

#[tokio::test]
async fn unsynced_drafts_excludes_synced_entries() {
    let (manager, store) = offline_manager();

    manager.save_local("dirty", "wip").await.unwrap();
    store
        .put_draft(&DraftEntry {
            key: "clean".into(),
            content: "done".into(),
            touched_at: Timestamp::now(),
            synced: true,
        })
        .await
        .unwrap();

    let unsynced = manager.unsynced_drafts().await.unwrap();
    assert_eq!(unsynced.len(), 1);
    assert_eq!(unsynced[0].key, "dirty");
}
