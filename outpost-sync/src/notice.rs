//! User-visible notifications.
//!
//! The engine surfaces exactly four notification classes; everything else
//! stays in the logs. Notices fan out on a broadcast channel, so delivery
//! is best-effort: a send with no subscribers is not an error.

use crate::engine::MAX_REPLAY_ATTEMPTS;
use outpost_types::ActionKind;
use std::fmt;

/// A user-visible event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Connectivity returned; a drain is starting.
    BackOnline,
    /// Connectivity was lost; queued changes will sync later.
    Offline,
    /// A drain finished and replayed `synced` actions.
    SyncComplete {
        /// Number of actions successfully replayed this drain.
        synced: usize,
    },
    /// An action exhausted its retry budget and was discarded.
    Abandoned {
        /// The kind of the discarded action.
        kind: ActionKind,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackOnline => write!(f, "back online, syncing your changes"),
            Self::Offline => write!(f, "offline mode, changes will sync when you're back online"),
            Self::SyncComplete { synced } => {
                write!(f, "sync complete: synced {synced} offline changes")
            }
            Self::Abandoned { kind } => write!(
                f,
                "sync failed: could not sync {kind} after {MAX_REPLAY_ATTEMPTS} attempts"
            ),
        }
    }
}
