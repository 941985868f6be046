//! Connectivity state.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// The client's current connectivity snapshot.
///
/// Created once at manager construction from live reachability/visibility
/// probes, mutated by the connectivity monitor's transition handlers, and
/// broadcast to subscribers. Never persisted; recomputed fresh on every
/// process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityState {
    /// Current reachability signal from the runtime network API.
    pub is_online: bool,
    /// Whether the client surface is currently foregrounded.
    pub is_visible: bool,
    /// When the most recent full drain completed, if any.
    pub last_sync: Option<Timestamp>,
}

impl ConnectivityState {
    /// Creates a fresh state with no completed drain.
    #[must_use]
    pub const fn new(is_online: bool, is_visible: bool) -> Self {
        Self {
            is_online,
            is_visible,
            last_sync: None,
        }
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::new(true, true)
    }
}
