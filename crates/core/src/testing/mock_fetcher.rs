//! Mock fetcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, Fetcher};
use crate::search::RawResult;

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    /// The query text that was sent upstream.
    pub text: String,
    /// The categories that were sent upstream.
    pub categories: Vec<u32>,
    /// When the fetch was made.
    pub timestamp: Instant,
}

/// Mock implementation of the Fetcher trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable raw results
/// - Track fetches for assertions
/// - Simulate failures and slow upstreams
#[derive(Debug, Default)]
pub struct MockFetcher {
    /// Configured results to return.
    results: Arc<RwLock<Vec<RawResult>>>,
    /// Recorded fetches.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<FetchError>>>,
    /// Artificial latency applied to every fetch.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockFetcher {
    /// Create a new mock fetcher with empty results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the results to return for subsequent fetches.
    pub async fn set_results(&self, results: Vec<RawResult>) {
        *self.results.write().await = results;
    }

    /// Make the next fetch fail with `error`.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every fetch by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Number of fetches made so far.
    pub async fn call_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, text: &str, categories: &[u32]) -> Result<Vec<RawResult>, FetchError> {
        self.fetches.write().await.push(RecordedFetch {
            text: text.to_string(),
            categories: categories.to_vec(),
            timestamp: Instant::now(),
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.results.read().await.clone())
    }
}
