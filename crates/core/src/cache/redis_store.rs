//! Redis-backed result store, shared by every server instance that points at
//! the same Redis database.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, ErrorKind, RedisError};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{ResultStore, StoreError};

/// Namespace prepended to every key, so `entry_count` can find this
/// service's entries in a shared database.
const KEY_PREFIX: &str = "torrent-search:";

/// Upper bound on establishing a connection. A blackholed server must not
/// stall the request that happens to trigger the (re)connect.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Keys requested per SCAN round trip in `entry_count`.
const SCAN_BATCH: usize = 500;

/// Result store on a Redis server.
///
/// The connection is opened lazily and dropped after an I/O failure, so a
/// Redis that is down at startup or restarts later is picked up again on the
/// next operation. Expiry is delegated to Redis (`SET .. PX`).
pub struct RedisResultStore {
    client: Client,
    conn: Mutex<Option<MultiplexedConnection>>,
}

impl RedisResultStore {
    /// Create a store for `url`. Accepts a full `redis://` URL or a bare
    /// `host:port`. No connection is made until the first operation.
    pub fn new(url: &str) -> Result<Self, StoreError> {
        let url = normalize_url(url);
        let client = Client::open(url.as_str()).map_err(map_redis_error)?;
        Ok(Self {
            client,
            conn: Mutex::new(None),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        let mut slot = self.conn.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = tokio::time::timeout(
            CONNECT_TIMEOUT,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| StoreError::Unavailable("timed out connecting to redis".to_string()))?
        .map_err(map_redis_error)?;

        debug!("Connected to redis");
        *slot = Some(conn.clone());
        Ok(conn)
    }

    /// Map `err`, forgetting the cached connection when the failure means it
    /// is no longer usable.
    async fn fail(&self, err: RedisError) -> StoreError {
        let mapped = map_redis_error(err);
        if matches!(mapped, StoreError::Unavailable(_)) {
            warn!(error = %mapped, "Dropping redis connection");
            *self.conn.lock().await = None;
        }
        mapped
    }
}

fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else {
        format!("redis://{}", url)
    }
}

fn prefixed(key: &str) -> String {
    format!("{}{}", KEY_PREFIX, key)
}

/// Connection-level failures mean the store is unreachable; anything the
/// server answered with is a store error.
fn map_redis_error(err: RedisError) -> StoreError {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        return StoreError::Unavailable(err.to_string());
    }

    match err.kind() {
        ErrorKind::InvalidClientConfig => StoreError::Unavailable(err.to_string()),
        ErrorKind::TypeError => StoreError::Serialization(err.to_string()),
        _ => StoreError::Database(err.to_string()),
    }
}

#[async_trait]
impl ResultStore for RedisResultStore {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.connection().await?;
        let value: Option<Vec<u8>> = match redis::cmd("GET")
            .arg(prefixed(key))
            .query_async(&mut conn)
            .await
        {
            Ok(value) => value,
            Err(e) => return Err(self.fail(e).await),
        };
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        let ttl_millis = u64::try_from(ttl.as_millis())
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or_else(|| {
                StoreError::Unavailable(format!("TTL of {:?} is out of range", ttl))
            })?;

        let mut conn = self.connection().await?;
        let outcome: Result<(), RedisError> = redis::cmd("SET")
            .arg(prefixed(key))
            .arg(value)
            .arg("PX")
            .arg(ttl_millis)
            .query_async(&mut conn)
            .await;

        match outcome {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e).await),
        }
    }

    async fn entry_count(&self) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        let pattern = format!("{}*", KEY_PREFIX);
        let mut cursor: u64 = 0;
        let mut count: u64 = 0;

        loop {
            let page: Result<(u64, Vec<String>), RedisError> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;

            let (next, keys) = match page {
                Ok(page) => page,
                Err(e) => return Err(self.fail(e).await),
            };
            count += keys.len() as u64;
            if next == 0 {
                return Ok(count);
            }
            cursor = next;
        }
    }
}
