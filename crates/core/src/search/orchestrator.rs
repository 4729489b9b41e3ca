//! End-to-end search: cache lookup, fetch, filter, cache store, paginate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::fetcher::{FetchError, Fetcher};
use crate::metrics::{RESULTS_FILTERED_OUT, SEARCH_RESULTS, UPSTREAM_DURATION, UPSTREAM_REQUESTS};

use super::{
    build_cache_key, filter_results, paginate, FilteredResult, Page, PageRequest, Query,
    RawResult, SearchError, DEFAULT_TRUSTED_TRACKER,
};

/// Serves searches through the result cache.
///
/// Holds one shared fetcher and one cache for the life of the process.
/// Concurrent misses for the same key may both fetch; each writes back the
/// complete filtered set of its own fetch, so the last writer wins whole.
pub struct SearchOrchestrator {
    fetcher: Arc<dyn Fetcher>,
    cache: ResultCache,
    trusted_tracker: String,
    fetch_timeout: Option<Duration>,
}

impl SearchOrchestrator {
    pub fn new(fetcher: Arc<dyn Fetcher>, cache: ResultCache) -> Self {
        Self {
            fetcher,
            cache,
            trusted_tracker: DEFAULT_TRUSTED_TRACKER.to_string(),
            fetch_timeout: None,
        }
    }

    /// Tracker accepted in safe mode.
    pub fn with_trusted_tracker(mut self, tracker: impl Into<String>) -> Self {
        self.trusted_tracker = tracker.into();
        self
    }

    /// Abort an upstream fetch that runs longer than `timeout`.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Search and return the requested page.
    pub async fn search(
        &self,
        query: &Query,
        page: PageRequest,
    ) -> Result<Page<FilteredResult>, SearchError> {
        let results = self.results(query).await?;
        Ok(paginate(&results, page))
    }

    /// The full filtered result list for `query`, from cache when possible.
    pub async fn results(&self, query: &Query) -> Result<Vec<FilteredResult>, SearchError> {
        let key = build_cache_key(query);

        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let raw = self.fetch(query).await?;
        let raw_count = raw.len();

        let filtered = filter_results(raw, query.safe_only(), &self.trusted_tracker);
        RESULTS_FILTERED_OUT.inc_by((raw_count - filtered.len()) as u64);
        SEARCH_RESULTS.observe(filtered.len() as f64);

        info!(
            query = %query.text(),
            categories = ?query.categories(),
            safe_only = query.safe_only(),
            fetched = raw_count,
            kept = filtered.len(),
            "Fetched search results"
        );

        if let Err(e) = self.cache.put(&key, &filtered).await {
            warn!(key = %key, error = %e, "Failed to cache search results");
        }

        Ok(filtered)
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawResult>, FetchError> {
        let fetcher = self.fetcher.name();
        let start = Instant::now();

        let fetch = self.fetcher.fetch(query.text(), query.categories());
        let outcome = match self.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(outcome) => outcome,
                Err(_) => Err(FetchError::Timeout),
            },
            None => fetch.await,
        };

        UPSTREAM_DURATION
            .with_label_values(&[fetcher])
            .observe(start.elapsed().as_secs_f64());

        let status = match &outcome {
            Ok(_) => "success",
            Err(FetchError::Timeout) => "timeout",
            Err(_) => "error",
        };
        UPSTREAM_REQUESTS.with_label_values(&[fetcher, status]).inc();

        if let Err(e) = &outcome {
            warn!(fetcher = fetcher, query = %query.text(), error = %e, "Upstream fetch failed");
        } else {
            debug!(
                fetcher = fetcher,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream fetch complete"
            );
        }

        outcome
    }
}
