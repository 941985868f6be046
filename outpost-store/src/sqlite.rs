//! SQLite implementation of the durable store.
//!
//! Each collection is its own table with a secondary index on its timestamp
//! column. The connection is shared behind a mutex; blocking SQLite work
//! runs on the tokio blocking pool so async callers can suspend on it.

use crate::{OfflineStore, StorageError, StorageResult};
use async_trait::async_trait;
use outpost_types::{
    ActionId, CacheEntry, DataRecord, DraftEntry, OfflineAction, Timestamp,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Durable store backed by a SQLite database.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened offline store");
        Self::with_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS pending_actions (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                payload TEXT NOT NULL,
                enqueued_at INTEGER NOT NULL,
                retry_count INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_actions_enqueued
                ON pending_actions(enqueued_at);

            CREATE TABLE IF NOT EXISTS offline_data (
                key TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                synced INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_data_updated
                ON offline_data(updated_at);
            CREATE INDEX IF NOT EXISTS idx_data_synced
                ON offline_data(synced);

            CREATE TABLE IF NOT EXISTS content_cache (
                key TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                touched_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_content_touched
                ON content_cache(touched_at);

            CREATE TABLE IF NOT EXISTS draft_cache (
                key TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                touched_at INTEGER NOT NULL,
                synced INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_drafts_touched
                ON draft_cache(touched_at);
            CREATE INDEX IF NOT EXISTS idx_drafts_synced
                ON draft_cache(synced);
            ",
        )?;
        Ok(())
    }

    /// Runs a closure against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap();
            f(&conn)
        })
        .await
        .map_err(|e| StorageError::Background(e.to_string()))?
    }
}

fn parse_action(
    id: String,
    kind: String,
    payload: String,
    enqueued_at: i64,
    retry_count: i64,
) -> StorageResult<OfflineAction> {
    Ok(OfflineAction {
        id: ActionId::parse(&id)
            .map_err(|e| StorageError::InvalidData(format!("bad action id {id}: {e}")))?,
        kind: kind
            .parse()
            .map_err(|_| StorageError::InvalidData(format!("unknown action kind: {kind}")))?,
        payload: serde_json::from_str(&payload)?,
        enqueued_at: Timestamp::from_millis(enqueued_at as u64),
        retry_count: retry_count as u32,
    })
}

fn parse_data(key: String, data: String, updated_at: i64, synced: bool) -> StorageResult<DataRecord> {
    Ok(DataRecord {
        key,
        data: serde_json::from_str(&data)?,
        updated_at: Timestamp::from_millis(updated_at as u64),
        synced,
    })
}

#[async_trait]
impl OfflineStore for SqliteStore {
    // ── Pending actions ──────────────────────────────────────────

    async fn put_action(&self, action: &OfflineAction) -> StorageResult<()> {
        let id = action.id.to_string();
        let kind = action.kind.to_string();
        let payload = serde_json::to_string(&action.payload)?;
        let enqueued_at = action.enqueued_at.as_millis() as i64;
        let retry_count = action.retry_count as i64;
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO pending_actions (id, kind, payload, enqueued_at, retry_count)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, kind, payload, enqueued_at, retry_count],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_action(&self, id: &ActionId) -> StorageResult<Option<OfflineAction>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT id, kind, payload, enqueued_at, retry_count
                     FROM pending_actions WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, i64>(3)?,
                            row.get::<_, i64>(4)?,
                        ))
                    },
                )
                .optional()?;
            row.map(|(id, kind, payload, enqueued_at, retries)| {
                parse_action(id, kind, payload, enqueued_at, retries)
            })
            .transpose()
        })
        .await
    }

    async fn all_actions(&self) -> StorageResult<Vec<OfflineAction>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, kind, payload, enqueued_at, retry_count FROM pending_actions",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?;
            let mut actions = Vec::new();
            for row in rows {
                let (id, kind, payload, enqueued_at, retries) = row?;
                actions.push(parse_action(id, kind, payload, enqueued_at, retries)?);
            }
            Ok(actions)
        })
        .await
    }

    async fn delete_action(&self, id: &ActionId) -> StorageResult<()> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM pending_actions WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
    }

    // ── Generic offline-synced data ──────────────────────────────

    async fn put_data(&self, record: &DataRecord) -> StorageResult<()> {
        let key = record.key.clone();
        let data = serde_json::to_string(&record.data)?;
        let updated_at = record.updated_at.as_millis() as i64;
        let synced = record.synced;
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO offline_data (key, data, updated_at, synced)
                 VALUES (?1, ?2, ?3, ?4)",
                params![key, data, updated_at, synced],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_data(&self, key: &str) -> StorageResult<Option<DataRecord>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT key, data, updated_at, synced FROM offline_data WHERE key = ?1",
                    params![key],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, i64>(2)?,
                            row.get::<_, bool>(3)?,
                        ))
                    },
                )
                .optional()?;
            row.map(|(key, data, updated_at, synced)| parse_data(key, data, updated_at, synced))
                .transpose()
        })
        .await
    }

    async fn all_data(&self) -> StorageResult<Vec<DataRecord>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT key, data, updated_at, synced FROM offline_data")?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, bool>(3)?,
                ))
            })?;
            let mut records = Vec::new();
            for row in rows {
                let (key, data, updated_at, synced) = row?;
                records.push(parse_data(key, data, updated_at, synced)?);
            }
            Ok(records)
        })
        .await
    }

    async fn delete_data(&self, key: &str) -> StorageResult<()> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM offline_data WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
    }

    // ── Read-through content cache ───────────────────────────────

    async fn put_content(&self, entry: &CacheEntry) -> StorageResult<()> {
        let entry = entry.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO content_cache (key, content, touched_at)
                 VALUES (?1, ?2, ?3)",
                params![entry.key, entry.content, entry.touched_at.as_millis() as i64],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_content(&self, key: &str) -> StorageResult<Option<CacheEntry>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let entry = conn
                .query_row(
                    "SELECT key, content, touched_at FROM content_cache WHERE key = ?1",
                    params![key],
                    |row| {
                        Ok(CacheEntry {
                            key: row.get(0)?,
                            content: row.get(1)?,
                            touched_at: Timestamp::from_millis(row.get::<_, i64>(2)? as u64),
                        })
                    },
                )
                .optional()?;
            Ok(entry)
        })
        .await
    }

    async fn all_content(&self) -> StorageResult<Vec<CacheEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key, content, touched_at FROM content_cache")?;
            let rows = stmt.query_map([], |row| {
                Ok(CacheEntry {
                    key: row.get(0)?,
                    content: row.get(1)?,
                    touched_at: Timestamp::from_millis(row.get::<_, i64>(2)? as u64),
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
    }

    async fn delete_content(&self, key: &str) -> StorageResult<()> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM content_cache WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
    }

    // ── Write-back draft cache ───────────────────────────────────

    async fn put_draft(&self, entry: &DraftEntry) -> StorageResult<()> {
        let entry = entry.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO draft_cache (key, content, touched_at, synced)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    entry.key,
                    entry.content,
                    entry.touched_at.as_millis() as i64,
                    entry.synced
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_draft(&self, key: &str) -> StorageResult<Option<DraftEntry>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let entry = conn
                .query_row(
                    "SELECT key, content, touched_at, synced FROM draft_cache WHERE key = ?1",
                    params![key],
                    |row| {
                        Ok(DraftEntry {
                            key: row.get(0)?,
                            content: row.get(1)?,
                            touched_at: Timestamp::from_millis(row.get::<_, i64>(2)? as u64),
                            synced: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(entry)
        })
        .await
    }

    async fn all_drafts(&self) -> StorageResult<Vec<DraftEntry>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT key, content, touched_at, synced FROM draft_cache")?;
            let rows = stmt.query_map([], |row| {
                Ok(DraftEntry {
                    key: row.get(0)?,
                    content: row.get(1)?,
                    touched_at: Timestamp::from_millis(row.get::<_, i64>(2)? as u64),
                    synced: row.get(3)?,
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
    }

    async fn delete_draft(&self, key: &str) -> StorageResult<()> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM draft_cache WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
    }

    async fn mark_draft_synced(&self, key: &str) -> StorageResult<()> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "UPDATE draft_cache SET synced = 1 WHERE key = ?1",
                params![key],
            )?;
            Ok(())
        })
        .await
    }
}
