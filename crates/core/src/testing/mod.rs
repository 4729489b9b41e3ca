//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the pipeline's collaborator
//! traits, so the orchestrator and HTTP layer can be exercised without a
//! running Jackett instance.
//!
//! # Example
//!
//! ```rust,ignore
//! use torrent_search_core::testing::{fixtures, MockFetcher};
//!
//! let fetcher = MockFetcher::new();
//! fetcher.set_results(vec![
//!     fixtures::raw_result("ubuntu", "Internet Archive", "magnet:?xt=urn:btih:abc"),
//! ]).await;
//! ```

mod mock_fetcher;
mod mock_store;

pub use mock_fetcher::{MockFetcher, RecordedFetch};
pub use mock_store::FailingStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::search::{FilteredResult, RawResult};

    /// Create a raw upstream record with reasonable defaults.
    pub fn raw_result(title: &str, tracker: &str, magnet_uri: &str) -> RawResult {
        RawResult {
            title: Some(title.to_string()),
            magnet_uri: Some(magnet_uri.to_string()),
            tracker: Some(tracker.to_string()),
            seeders: Some(50),
            peers: Some(60),
            size: Some(1024 * 1024 * 700), // 700 MB
            description: Some(format!("{} via {}", title, tracker)),
            category: Some(vec![2000]),
        }
    }

    /// Create a filtered result with reasonable defaults.
    pub fn filtered_result(title: &str, tracker: &str) -> FilteredResult {
        FilteredResult {
            title: title.to_string(),
            category: vec![2000],
            magnet_uri: format!("magnet:?xt=urn:btih:{}", title),
            seeders: 50,
            size: 1024 * 1024 * 700,
            peers: 60,
            description: format!("{} via {}", title, tracker),
            tracker: tracker.to_string(),
        }
    }
}
