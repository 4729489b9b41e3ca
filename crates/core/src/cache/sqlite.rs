//! SQLite-backed result store.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{ResultStore, StoreError};

/// SQLite-backed result store.
///
/// Expiry is a column compared against the wall clock on every read; expired
/// rows are purged on write. Statements run on the blocking thread pool.
pub struct SqliteResultStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteResultStore {
    /// Create a new SQLite store, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS search_cache (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL,
                expires_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_search_cache_expires ON search_cache(expires_at);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("connection mutex poisoned".to_string()))?;
            f(&*guard)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("cache task failed: {}", e)))?
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT value FROM search_cache WHERE key = ? AND expires_at > ?",
                params![key, now_millis()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))
        })
        .await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        let now = now_millis();
        let ttl_millis = i64::try_from(ttl.as_millis()).map_err(|_| {
            StoreError::Unavailable(format!("TTL of {:?} is out of range", ttl))
        })?;
        let expires_at = now.saturating_add(ttl_millis);

        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM search_cache WHERE expires_at <= ?",
                params![now],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
            conn.execute(
                "INSERT OR REPLACE INTO search_cache (key, value, expires_at) VALUES (?, ?, ?)",
                params![key, value, expires_at],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
            Ok(())
        })
        .await
    }

    async fn entry_count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .with_conn(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM search_cache WHERE expires_at > ?",
                    params![now_millis()],
                    |row| row.get(0),
                )
                .map_err(|e| StoreError::Database(e.to_string()))
            })
            .await?;
        Ok(count as u64)
    }
}
