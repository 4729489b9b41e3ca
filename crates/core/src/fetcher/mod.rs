//! Upstream indexer access.
//!
//! The [`Fetcher`] trait is the only way the search pipeline talks to the
//! indexer aggregator, so tests can swap in [`crate::testing::MockFetcher`].

mod jackett;

pub use jackett::JackettFetcher;

use async_trait::async_trait;
use thiserror::Error;

use crate::search::RawResult;

/// Errors that can occur while fetching from the upstream aggregator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Upstream connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Upstream API error: {0}")]
    ApiError(String),

    #[error("Upstream returned an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("Upstream request timed out")]
    Timeout,
}

/// Source of raw search results.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Backend name for logging and metrics.
    fn name(&self) -> &str;

    /// Run one search against all configured indexers.
    async fn fetch(&self, text: &str, categories: &[u32]) -> Result<Vec<RawResult>, FetchError>;
}
