//! Queued offline actions.
//!
//! An action is a durable record of a mutation the client intends to apply
//! remotely. The engine treats payloads as opaque JSON; only the replay
//! backend knows what they mean.

use crate::{ActionId, Error, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of replayable remote operations.
///
/// Each kind maps to exactly one remote-call handler in the replay backend.
/// String forms use the wire tags ("save-code", "save-progress",
/// "submit-project"); parsing an unknown tag is an error rather than a
/// silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Persist a user-edited code buffer remotely.
    SaveCode,
    /// Persist lesson progress remotely.
    SaveProgress,
    /// Submit a completed project remotely.
    SubmitProject,
}

impl ActionKind {
    /// Returns the wire tag for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SaveCode => "save-code",
            Self::SaveProgress => "save-progress",
            Self::SubmitProject => "submit-project",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "save-code" => Ok(Self::SaveCode),
            "save-progress" => Ok(Self::SaveProgress),
            "submit-project" => Ok(Self::SubmitProject),
            other => Err(Error::UnknownActionKind(other.to_string())),
        }
    }
}

/// A mutation recorded while offline (or while a drain is pending), to be
/// replayed against the remote service.
///
/// Lives in the durable store from the moment enqueue returns until it is
/// either replayed successfully or abandoned after exhausting its retry
/// budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineAction {
    /// Unique identifier, generated at enqueue time.
    pub id: ActionId,

    /// Which remote operation to replay.
    pub kind: ActionKind,

    /// Opaque structured data required to replay the action.
    pub payload: serde_json::Value,

    /// Monotonic enqueue timestamp; drains replay in ascending order.
    pub enqueued_at: Timestamp,

    /// Number of failed replay attempts so far.
    pub retry_count: u32,
}

impl OfflineAction {
    /// Creates a new action with a fresh id and timestamp.
    #[must_use]
    pub fn new(kind: ActionKind, payload: serde_json::Value) -> Self {
        Self {
            id: ActionId::new(),
            kind,
            payload,
            enqueued_at: Timestamp::now(),
            retry_count: 0,
        }
    }
}
