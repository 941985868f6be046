//! Connectivity monitor.
//!
//! A debounced mirror of runtime-owned reachability and visibility. The
//! embedding runtime feeds edges in via `network_changed` and
//! `visibility_changed`; the monitor updates the shared state, publishes it,
//! and triggers drains where a transition calls for one. Triggered work is
//! spawned, never awaited: no transition handler blocks.

use crate::engine::SyncEngine;
use crate::notice::Notice;
use outpost_types::ConnectivityState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Mirrors runtime connectivity and triggers the sync engine on transitions.
pub struct ConnectivityMonitor {
    state: Arc<RwLock<ConnectivityState>>,
    engine: Arc<SyncEngine>,
    notices: broadcast::Sender<Notice>,
    state_tx: broadcast::Sender<ConnectivityState>,
    shutdown: Arc<AtomicBool>,
}

impl ConnectivityMonitor {
    pub(crate) fn new(
        state: Arc<RwLock<ConnectivityState>>,
        engine: Arc<SyncEngine>,
        notices: broadcast::Sender<Notice>,
        state_tx: broadcast::Sender<ConnectivityState>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            state,
            engine,
            notices,
            state_tx,
            shutdown,
        }
    }

    /// Handles a reachability change from the runtime.
    ///
    /// offline to online notifies and starts a drain; online to offline
    /// notifies only (an in-flight drain is not interrupted). Non-edges
    /// re-publish state and trigger nothing.
    pub async fn network_changed(&self, online: bool) {
        if self.shutdown.load(Ordering::SeqCst) {
            return;
        }

        let snapshot = {
            let mut st = self.state.write().await;
            let was_online = st.is_online;
            st.is_online = online;
            (*st, was_online)
        };
        let (state, was_online) = snapshot;
        let _ = self.state_tx.send(state);

        if !was_online && online {
            debug!("connectivity restored");
            let _ = self.notices.send(Notice::BackOnline);
            self.spawn_drain();
        } else if was_online && !online {
            debug!("connectivity lost");
            let _ = self.notices.send(Notice::Offline);
        }
    }

    /// Handles a foreground/background change from the runtime.
    ///
    /// hidden to visible while online starts a drain, covering the case
    /// where connectivity changed in the background and the runtime never
    /// fired an online event.
    pub async fn visibility_changed(&self, visible: bool) {
        if self.shutdown.load(Ordering::SeqCst) {
            return;
        }

        let snapshot = {
            let mut st = self.state.write().await;
            let was_visible = st.is_visible;
            st.is_visible = visible;
            (*st, was_visible)
        };
        let (state, was_visible) = snapshot;
        let _ = self.state_tx.send(state);

        if !was_visible && visible && state.is_online {
            debug!("foregrounded while online");
            self.spawn_drain();
        }
    }

    fn spawn_drain(&self) {
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            engine.drain().await;
        });
    }
}
