//! Offline manager: the façade callers hold.
//!
//! One instance per client session. Composes the durable store, the sync
//! engine, the connectivity monitor, and the cache layer; everything the
//! rest of the application touches goes through here.

use crate::backend::RemoteBackend;
use crate::cache::{CacheLayer, DEFAULT_EVICT_HORIZON};
use crate::engine::SyncEngine;
use crate::error::SyncResult;
use crate::monitor::ConnectivityMonitor;
use crate::notice::Notice;
use outpost_store::OfflineStore;
use outpost_types::{ActionId, ActionKind, ConnectivityState, DraftEntry, OfflineAction};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

/// Configuration for the offline manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Initial reachability, probed by the embedding runtime at startup.
    pub start_online: bool,
    /// Initial visibility, probed by the embedding runtime at startup.
    pub start_visible: bool,
    /// Staleness horizon for [`OfflineManager::evict_stale`].
    pub evict_horizon: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            start_online: true,
            start_visible: true,
            evict_horizon: DEFAULT_EVICT_HORIZON,
        }
    }
}

/// The offline engine façade.
pub struct OfflineManager {
    store: Arc<dyn OfflineStore>,
    engine: Arc<SyncEngine>,
    monitor: ConnectivityMonitor,
    cache: CacheLayer,
    state: Arc<RwLock<ConnectivityState>>,
    notices: broadcast::Sender<Notice>,
    state_tx: broadcast::Sender<ConnectivityState>,
    shutdown: Arc<AtomicBool>,
    config: ManagerConfig,
}

impl OfflineManager {
    /// Builds a manager over the given store and replay backend.
    pub fn new(
        store: Arc<dyn OfflineStore>,
        backend: Arc<dyn RemoteBackend>,
        config: ManagerConfig,
    ) -> Self {
        let state = Arc::new(RwLock::new(ConnectivityState::new(
            config.start_online,
            config.start_visible,
        )));
        let (notices, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (state_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));

        let engine = Arc::new(SyncEngine::new(
            Arc::clone(&store),
            backend,
            Arc::clone(&state),
            notices.clone(),
            state_tx.clone(),
            Arc::clone(&shutdown),
        ));
        let monitor = ConnectivityMonitor::new(
            Arc::clone(&state),
            Arc::clone(&engine),
            notices.clone(),
            state_tx.clone(),
            Arc::clone(&shutdown),
        );
        let cache = CacheLayer::new(Arc::clone(&store));

        Self {
            store,
            engine,
            monitor,
            cache,
            state,
            notices,
            state_tx,
            shutdown,
            config,
        }
    }

    // ── Action queue ─────────────────────────────────────────────

    /// Durably enqueues an action and returns once it is persisted.
    ///
    /// While online this also starts a drain in the background; while
    /// offline the action just waits for the next connectivity transition.
    pub async fn queue_action(
        &self,
        kind: ActionKind,
        payload: serde_json::Value,
    ) -> SyncResult<ActionId> {
        let action = OfflineAction::new(kind, payload);
        self.store.put_action(&action).await?;
        debug!(kind = %kind, id = %action.id, "queued action");

        if !self.is_shutdown() && self.state.read().await.is_online {
            self.spawn_drain();
        }
        Ok(action.id)
    }

    /// Number of actions waiting to be replayed, for UI badges.
    pub async fn pending_count(&self) -> SyncResult<u32> {
        Ok(self.store.all_actions().await?.len() as u32)
    }

    /// Runs a drain now. Idempotent with the automatic triggers: offline,
    /// shutdown, or an in-flight drain all make this a no-op.
    pub async fn drain(&self) {
        self.engine.drain().await;
    }

    // ── Editor buffers (write-back cache) ────────────────────────

    /// Persists a local edit and, while online, queues its matching
    /// "save-code" action in the same call. While offline only the draft is
    /// written; the caller re-issues the save after reconnecting.
    pub async fn save_local(&self, key: &str, content: &str) -> SyncResult<()> {
        self.cache.draft_put(key, content).await?;

        if !self.is_shutdown() && self.state.read().await.is_online {
            self.queue_action(ActionKind::SaveCode, json!({"key": key, "content": content}))
                .await?;
        }
        Ok(())
    }

    /// Returns the locally saved buffer under `key`, if any.
    pub async fn get_local(&self, key: &str) -> SyncResult<Option<String>> {
        self.cache.draft_get(key).await
    }

    /// Drafts not yet confirmed persisted remotely.
    pub async fn unsynced_drafts(&self) -> SyncResult<Vec<DraftEntry>> {
        self.cache.unsynced_drafts().await
    }

    // ── Content cache (read-through) ─────────────────────────────

    /// Caches remote content under `key`.
    pub async fn cache_put(&self, key: &str, content: &str) -> SyncResult<()> {
        self.cache.content_put(key, content).await
    }

    /// Returns cached content under `key`, if any.
    pub async fn cache_get(&self, key: &str) -> SyncResult<Option<String>> {
        self.cache.content_get(key).await
    }

    // ── Generic offline data ─────────────────────────────────────

    /// Stores a generic data record.
    pub async fn data_put(&self, key: &str, data: serde_json::Value) -> SyncResult<()> {
        self.cache.data_put(key, data).await
    }

    /// Returns the generic data value under `key`, if any.
    pub async fn data_get(&self, key: &str) -> SyncResult<Option<serde_json::Value>> {
        self.cache.data_get(key).await
    }

    // ── Maintenance ──────────────────────────────────────────────

    /// Evicts stale cache records using the configured horizon.
    pub async fn evict_stale(&self) -> SyncResult<usize> {
        self.cache.evict_stale(self.config.evict_horizon).await
    }

    // ── Connectivity ─────────────────────────────────────────────

    /// Feeds a reachability change from the runtime.
    pub async fn network_changed(&self, online: bool) {
        self.monitor.network_changed(online).await;
    }

    /// Feeds a visibility change from the runtime.
    pub async fn visibility_changed(&self, visible: bool) {
        self.monitor.visibility_changed(visible).await;
    }

    /// Current connectivity snapshot.
    pub async fn state(&self) -> ConnectivityState {
        *self.state.read().await
    }

    /// Subscribes to connectivity-state changes. Dropping the receiver
    /// unsubscribes; that is O(1) and safe from inside a notification
    /// handler.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectivityState> {
        self.state_tx.subscribe()
    }

    /// Subscribes to user-visible notices.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Stops sync triggering and draining. Storage stays readable and
    /// writable; only the background machinery goes quiet.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        debug!("offline manager shut down");
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    fn spawn_drain(&self) {
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            engine.drain().await;
        });
    }
}
