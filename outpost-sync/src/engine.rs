//! Sync engine: drains the pending-action backlog against the remote.
//!
//! A drain is one complete pass over the backlog in enqueue order. Ordering
//! is best-effort FIFO: a failed action waits for the next drain rather than
//! being retried in place, so one permanently-failing action cannot starve
//! the actions behind it.

use crate::backend::RemoteBackend;
use crate::notice::Notice;
use outpost_store::OfflineStore;
use outpost_types::{ActionKind, ConnectivityState, OfflineAction, Timestamp};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

/// How many failed replays an action is allowed before abandonment.
pub const MAX_REPLAY_ATTEMPTS: u32 = 3;

/// Drains pending actions, one in-flight pass at a time.
pub struct SyncEngine {
    store: Arc<dyn OfflineStore>,
    backend: Arc<dyn RemoteBackend>,
    state: Arc<RwLock<ConnectivityState>>,
    notices: broadcast::Sender<Notice>,
    state_tx: broadcast::Sender<ConnectivityState>,
    drain_in_flight: AtomicBool,
    shutdown: Arc<AtomicBool>,
}

/// Releases the in-flight flag when a drain exits by any path.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SyncEngine {
    pub(crate) fn new(
        store: Arc<dyn OfflineStore>,
        backend: Arc<dyn RemoteBackend>,
        state: Arc<RwLock<ConnectivityState>>,
        notices: broadcast::Sender<Notice>,
        state_tx: broadcast::Sender<ConnectivityState>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            store,
            backend,
            state,
            notices,
            state_tx,
            drain_in_flight: AtomicBool::new(false),
            shutdown,
        }
    }

    /// Runs one pass over the pending backlog.
    ///
    /// Returns immediately when offline, after shutdown, or while another
    /// drain is in flight. The in-flight guard is a flag, not a queue: the
    /// dropped second trigger is not re-run when the first pass finishes,
    /// so actions added mid-drain wait for the next trigger.
    pub async fn drain(&self) {
        if self.shutdown.load(Ordering::SeqCst) {
            return;
        }
        if !self.state.read().await.is_online {
            return;
        }
        if self.drain_in_flight.swap(true, Ordering::SeqCst) {
            debug!("drain already in flight, skipping");
            return;
        }
        let _guard = DrainGuard(&self.drain_in_flight);

        let mut backlog = match self.store.all_actions().await {
            Ok(actions) => actions,
            Err(e) => {
                warn!("failed to load pending actions: {e}");
                return;
            }
        };
        backlog.sort_by_key(|a| a.enqueued_at);

        let processed = backlog.len();
        let mut synced = 0usize;

        for action in backlog {
            match self.backend.replay(action.kind, &action.payload).await {
                Ok(()) => {
                    self.complete_action(&action).await;
                    synced += 1;
                }
                Err(e) => {
                    warn!(kind = %action.kind, id = %action.id, "replay failed: {e}");
                    self.defer_or_abandon(action).await;
                }
            }
        }

        {
            let mut st = self.state.write().await;
            st.last_sync = Some(Timestamp::now());
            let snapshot = *st;
            drop(st);
            let _ = self.state_tx.send(snapshot);
        }

        if processed > 0 {
            let _ = self.notices.send(Notice::SyncComplete { synced });
            info!(processed, synced, "drain complete");
        }
    }

    /// Removes a successfully replayed action and settles its side effects.
    async fn complete_action(&self, action: &OfflineAction) {
        if let Err(e) = self.store.delete_action(&action.id).await {
            // The action stays queued and will replay again next drain;
            // remote handlers must tolerate the duplicate.
            warn!(id = %action.id, "failed to delete completed action: {e}");
            return;
        }

        if action.kind == ActionKind::SaveCode {
            if let Some(key) = action.payload.get("key").and_then(|k| k.as_str()) {
                if let Err(e) = self.store.mark_draft_synced(key).await {
                    warn!(key, "failed to mark draft synced: {e}");
                }
            }
        }
        debug!(kind = %action.kind, id = %action.id, "action replayed");
    }

    /// Charges one retry credit; abandons the action once the budget is gone.
    async fn defer_or_abandon(&self, mut action: OfflineAction) {
        action.retry_count += 1;
        if action.retry_count >= MAX_REPLAY_ATTEMPTS {
            if let Err(e) = self.store.delete_action(&action.id).await {
                warn!(id = %action.id, "failed to delete abandoned action: {e}");
                return;
            }
            info!(kind = %action.kind, id = %action.id, "action abandoned after {} attempts", action.retry_count);
            let _ = self.notices.send(Notice::Abandoned { kind: action.kind });
        } else if let Err(e) = self.store.put_action(&action).await {
            warn!(id = %action.id, "failed to persist retry count: {e}");
        }
    }
}
