//! Offline action queue and sync engine for Outpost.
//!
//! Lets a client keep working while disconnected: mutations are recorded
//! durably as actions, replayed against the remote service once
//! connectivity returns, and local caches keep reads and edits working in
//! the meantime.
//!
//! # Architecture
//!
//! - **Manager**: the façade callers hold; owns lifecycle and wiring
//! - **Engine**: drains the pending backlog with a bounded-retry policy
//! - **Monitor**: mirrors runtime connectivity and triggers drains
//! - **Cache**: read-through content cache plus write-back draft cache
//! - **Backend**: the replay seam; HTTP in production, scripted in tests
//!
//! # Flow
//!
//! 1. A caller queues an action; it is durably persisted before the call
//!    returns.
//! 2. If online, a drain starts in the background; otherwise the action
//!    waits for the next offline-to-online or hidden-to-visible edge.
//! 3. The drain replays actions oldest-first. Successes are deleted;
//!    failures are retried on later drains and abandoned (with a terminal
//!    notice) after three failed attempts.
//!
//! # Example
//!
//! ```no_run
//! use outpost_store::SqliteStore;
//! use outpost_sync::{HttpBackend, HttpConfig, ManagerConfig, OfflineManager};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::open("offline.db")?);
//! let backend = Arc::new(HttpBackend::new(HttpConfig::default())?);
//! let manager = OfflineManager::new(store, backend, ManagerConfig::default());
//! # Ok(())
//! # }
//! ```

pub mod backend;
mod cache;
mod engine;
mod error;
mod http;
mod manager;
mod monitor;
mod notice;

pub use backend::RemoteBackend;
pub use cache::DEFAULT_EVICT_HORIZON;
pub use engine::MAX_REPLAY_ATTEMPTS;
pub use error::{ReplayError, SyncError, SyncResult};
pub use http::{HttpBackend, HttpConfig};
pub use manager::{ManagerConfig, OfflineManager};
pub use notice::Notice;
