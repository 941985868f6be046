use outpost_store::{MemoryStore, OfflineStore};
use outpost_sync::backend::mock::ScriptedBackend;
use outpost_sync::{ManagerConfig, Notice, OfflineManager, ReplayError};
use outpost_types::{ActionKind, OfflineAction, Timestamp};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Opt-in test logging: `RUST_LOG=debug cargo test` to see drain traces.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn manager_with(
    backend: Arc<ScriptedBackend>,
    online: bool,
) -> (OfflineManager, Arc<MemoryStore>) {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let manager = OfflineManager::new(
        store.clone(),
        backend,
        ManagerConfig {
            start_online: online,
            ..Default::default()
        },
    );
    (manager, store)
}

fn seeded_action(kind: ActionKind, at_millis: u64, payload: serde_json::Value) -> OfflineAction {
    let mut action = OfflineAction::new(kind, payload);
    action.enqueued_at = Timestamp::from_millis(at_millis);
    action
}

fn collect(rx: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}

// ── Retry bound ──────────────────────────────────────────────────

#[tokio::test]
async fn always_failing_action_abandoned_after_three_drains() {
    let backend = Arc::new(ScriptedBackend::always_failing());
    let (manager, store) = manager_with(backend.clone(), true);
    let mut notices = manager.notices();

    let action = seeded_action(ActionKind::SaveProgress, 100, json!({"lesson": 1}));
    store.put_action(&action).await.unwrap();

    manager.drain().await;
    let kept = store.get_action(&action.id).await.unwrap().unwrap();
    assert_eq!(kept.retry_count, 1);

    manager.drain().await;
    let kept = store.get_action(&action.id).await.unwrap().unwrap();
    assert_eq!(kept.retry_count, 2);

    manager.drain().await;
    assert!(store.get_action(&action.id).await.unwrap().is_none());
    assert_eq!(backend.call_count(), 3);

    let abandoned: Vec<_> = collect(&mut notices)
        .into_iter()
        .filter(|n| matches!(n, Notice::Abandoned { .. }))
        .collect();
    assert_eq!(
        abandoned,
        vec![Notice::Abandoned {
            kind: ActionKind::SaveProgress
        }]
    );
}

#[tokio::test]
async fn failing_action_attempted_once_per_drain() {
    let backend = Arc::new(ScriptedBackend::always_failing());
    let (manager, store) = manager_with(backend.clone(), true);

    store
        .put_action(&seeded_action(ActionKind::SaveCode, 100, json!({})))
        .await
        .unwrap();

    manager.drain().await;
    assert_eq!(backend.call_count(), 1);
}

// ── Idempotent success removal ───────────────────────────────────

#[tokio::test]
async fn successful_action_never_replayed_again() {
    let backend = Arc::new(ScriptedBackend::always_ok());
    let (manager, store) = manager_with(backend.clone(), true);

    store
        .put_action(&seeded_action(ActionKind::SubmitProject, 100, json!({"p": 1})))
        .await
        .unwrap();

    manager.drain().await;
    assert!(store.all_actions().await.unwrap().is_empty());
    assert_eq!(backend.call_count(), 1);

    manager.drain().await;
    manager.drain().await;
    assert_eq!(backend.call_count(), 1);
}

// ── Single in-flight drain ───────────────────────────────────────

#[tokio::test]
async fn concurrent_drain_is_dropped_not_queued() {
    let backend =
        Arc::new(ScriptedBackend::always_ok().with_delay(Duration::from_millis(50)));
    let (manager, store) = manager_with(backend.clone(), true);
    let mut notices = manager.notices();

    for at in [100, 200, 300] {
        store
            .put_action(&seeded_action(ActionKind::SaveCode, at, json!({"at": at})))
            .await
            .unwrap();
    }

    tokio::join!(manager.drain(), manager.drain());

    // One pass over the backlog, not two.
    assert_eq!(backend.call_count(), 3);
    let complete: Vec<_> = collect(&mut notices)
        .into_iter()
        .filter(|n| matches!(n, Notice::SyncComplete { .. }))
        .collect();
    assert_eq!(complete, vec![Notice::SyncComplete { synced: 3 }]);
}

// ── Offline no-op ────────────────────────────────────────────────

#[tokio::test]
async fn drain_is_noop_while_offline() {
    let backend = Arc::new(ScriptedBackend::always_ok());
    let (manager, store) = manager_with(backend.clone(), false);
    let mut notices = manager.notices();

    store
        .put_action(&seeded_action(ActionKind::SaveCode, 100, json!({})))
        .await
        .unwrap();

    manager.drain().await;
    assert_eq!(backend.call_count(), 0);
    assert_eq!(store.all_actions().await.unwrap().len(), 1);
    assert!(collect(&mut notices).is_empty());
}

// ── Summary notice ───────────────────────────────────────────────

#[tokio::test]
async fn summary_counts_successes_only() {
    let backend = Arc::new(ScriptedBackend::with_outcomes(vec![
        Ok(()),
        Err(ReplayError::Rejected { status: 500 }),
    ]));
    let (manager, store) = manager_with(backend, true);
    let mut notices = manager.notices();

    store
        .put_action(&seeded_action(ActionKind::SaveCode, 100, json!({"n": 1})))
        .await
        .unwrap();
    store
        .put_action(&seeded_action(ActionKind::SaveProgress, 200, json!({"n": 2})))
        .await
        .unwrap();

    manager.drain().await;
    let complete: Vec<_> = collect(&mut notices)
        .into_iter()
        .filter(|n| matches!(n, Notice::SyncComplete { .. }))
        .collect();
    assert_eq!(complete, vec![Notice::SyncComplete { synced: 1 }]);
}

#[tokio::test]
async fn empty_backlog_updates_last_sync_without_notice() {
    let backend = Arc::new(ScriptedBackend::always_ok());
    let (manager, _store) = manager_with(backend, true);
    let mut notices = manager.notices();

    assert!(manager.state().await.last_sync.is_none());
    manager.drain().await;
    assert!(manager.state().await.last_sync.is_some());
    assert!(collect(&mut notices).is_empty());
}

// ── Ordering scenario ────────────────────────────────────────────

#[tokio::test]
async fn deferred_action_completes_on_next_drain() {
    // A (enqueued first) fails once then succeeds; B always succeeds.
    let backend = Arc::new(ScriptedBackend::with_outcomes(vec![Err(
        ReplayError::Network("connection reset".into()),
    )]));
    let (manager, store) = manager_with(backend.clone(), true);
    let mut notices = manager.notices();

    let a = seeded_action(ActionKind::SaveCode, 100, json!({"buf": "a"}));
    let b = seeded_action(ActionKind::SaveProgress, 200, json!({"buf": "b"}));
    store.put_action(&a).await.unwrap();
    store.put_action(&b).await.unwrap();

    manager.drain().await;
    let remaining = store.all_actions().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, a.id);
    assert_eq!(remaining[0].retry_count, 1);
    assert_eq!(collect(&mut notices), vec![Notice::SyncComplete { synced: 1 }]);

    manager.drain().await;
    assert!(store.all_actions().await.unwrap().is_empty());
    assert_eq!(collect(&mut notices), vec![Notice::SyncComplete { synced: 1 }]);

    // Replay order: A then B in drain one, A again in drain two.
    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].1, json!({"buf": "a"}));
    assert_eq!(calls[1].1, json!({"buf": "b"}));
    assert_eq!(calls[2].1, json!({"buf": "a"}));
}

// ── Draft settlement ─────────────────────────────────────────────

#[tokio::test]
async fn successful_save_code_marks_draft_synced() {
    let backend = Arc::new(ScriptedBackend::always_ok());
    let (manager, store) = manager_with(backend, true);

    store
        .put_draft(&outpost_types::DraftEntry::new("lesson-1/main.sol", "contract A {}"))
        .await
        .unwrap();
    store
        .put_action(&seeded_action(
            ActionKind::SaveCode,
            100,
            json!({"key": "lesson-1/main.sol", "content": "contract A {}"}),
        ))
        .await
        .unwrap();

    manager.drain().await;
    let draft = store.get_draft("lesson-1/main.sol").await.unwrap().unwrap();
    assert!(draft.synced);
}

// ── Notice wording ───────────────────────────────────────────────

#[test]
fn notice_display_strings() {
    assert_eq!(
        Notice::BackOnline.to_string(),
        "back online, syncing your changes"
    );
    assert_eq!(
        Notice::Offline.to_string(),
        "offline mode, changes will sync when you're back online"
    );
    assert_eq!(
        Notice::SyncComplete { synced: 4 }.to_string(),
        "sync complete: synced 4 offline changes"
    );
    assert_eq!(
        Notice::Abandoned {
            kind: ActionKind::SubmitProject
        }
        .to_string(),
        "sync failed: could not sync submit-project after 3 attempts"
    );
}
