use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::metrics::{CACHE_LOOKUPS, CACHE_WRITES};
use crate::search::FilteredResult;

use super::{ResultStore, StoreError};

/// Cache-aside front for a [`ResultStore`].
///
/// Encodes result lists as JSON with a TTL that is fixed for the lifetime of
/// the cache. Read faults never surface: an unreachable store or an
/// undecodable entry is reported and treated as a miss.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn ResultStore>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(store: Arc<dyn ResultStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &Arc<dyn ResultStore> {
        &self.store
    }

    /// Look up a cached result list.
    pub async fn get(&self, key: &str) -> Option<Vec<FilteredResult>> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                return None;
            }
            Err(e) => {
                warn!(key = %key, store = self.store.name(), error = %e, "Cache read failed");
                CACHE_LOOKUPS.with_label_values(&["error"]).inc();
                return None;
            }
        };

        match decode_results(&bytes) {
            Ok(results) => {
                debug!(key = %key, results = results.len(), "Cache hit");
                CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                Some(results)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                CACHE_LOOKUPS.with_label_values(&["error"]).inc();
                None
            }
        }
    }

    /// Store a result list, replacing any existing entry for `key`.
    pub async fn put(&self, key: &str, results: &[FilteredResult]) -> Result<(), StoreError> {
        let outcome = match encode_results(results) {
            Ok(bytes) => self.store.set(key, bytes, self.ttl).await,
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(()) => {
                debug!(
                    key = %key,
                    results = results.len(),
                    ttl_secs = self.ttl.as_secs(),
                    "Cached results"
                );
                CACHE_WRITES.with_label_values(&["success"]).inc();
            }
            Err(_) => {
                CACHE_WRITES.with_label_values(&["error"]).inc();
            }
        }

        outcome
    }
}

/// Serialize a result list into the cache wire format.
pub fn encode_results(results: &[FilteredResult]) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(results).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Parse a result list from the cache wire format.
pub fn decode_results(bytes: &[u8]) -> Result<Vec<FilteredResult>, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}
