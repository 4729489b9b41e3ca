//! Result cache: a TTL'd key/value store holding serialized result sets.
//!
//! The pipeline only owns the serialization shape ([`ResultCache`]); storage
//! is delegated to a [`ResultStore`] backend, which is also responsible for
//! expiring entries.

mod memory;
mod redis_store;
mod result_cache;
mod sqlite;

pub use memory::MemoryResultStore;
pub use redis_store::RedisResultStore;
pub use result_cache::{decode_results, encode_results, ResultCache};
pub use sqlite::SqliteResultStore;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors for cache store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Byte-oriented key/value store with per-write expiry.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch the value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any previous entry. The entry
    /// expires `ttl` from now.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError>;

    /// Number of unexpired entries.
    async fn entry_count(&self) -> Result<u64, StoreError>;
}
