//! Monotonic millisecond timestamps.
//!
//! Wall-clock milliseconds since the Unix epoch, with a process-wide
//! high-water mark so `now()` is strictly increasing even when called
//! several times within the same millisecond (or across a clock step
//! backwards). Used for enqueue ordering and cache staleness, never for
//! deduplication or conflict resolution.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

static LAST: AtomicU64 = AtomicU64::new(0);

/// A millisecond timestamp, strictly monotonic within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Returns the current timestamp, strictly greater than any timestamp
    /// previously returned by this process.
    #[must_use]
    pub fn now() -> Self {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis() as u64;

        let mut prev = LAST.load(Ordering::Relaxed);
        loop {
            let next = wall.max(prev + 1);
            match LAST.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return Self(next),
                Err(observed) => prev = observed,
            }
        }
    }

    /// Creates a timestamp from raw milliseconds since the Unix epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the milliseconds since the Unix epoch.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns this timestamp moved back by `d`, saturating at zero.
    #[must_use]
    pub fn saturating_sub(&self, d: Duration) -> Self {
        Self(self.0.saturating_sub(d.as_millis() as u64))
    }

    /// Returns true if this timestamp is older than `horizon` relative
    /// to `reference`.
    #[must_use]
    pub fn is_older_than(&self, horizon: Duration, reference: Timestamp) -> bool {
        *self < reference.saturating_sub(horizon)
    }
}
