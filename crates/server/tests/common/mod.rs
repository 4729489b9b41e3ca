//! Common test utilities for HTTP-level testing with mocks.
//!
//! Builds the real router in-process with a [`MockFetcher`] standing in for
//! Jackett, so requests can be driven through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use torrent_search_core::{
    testing::MockFetcher, CacheConfig, Config, Fetcher, JackettConfig, LoggingConfig,
    MemoryResultStore, ResultCache, ResultStore, SearchConfig, SearchOrchestrator, ServerConfig,
};

/// Re-export fixtures for test convenience
pub use torrent_search_core::testing::fixtures;

/// Test fixture with a mock upstream and an in-memory result cache.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock fetcher - configure upstream results and failures
    pub fetcher: Arc<MockFetcher>,
    /// Cache store backing the orchestrator
    pub store: Arc<MemoryResultStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Parsed JSON body, or the raw text as a JSON string when the body is
    /// not JSON (e.g. the metrics exposition).
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Upstream fetch deadline, if any
    pub fetch_timeout: Option<Duration>,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(test_config: TestConfig) -> Self {
        let fetcher = Arc::new(MockFetcher::new());
        let store = Arc::new(MemoryResultStore::new());

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 8080, // Not used for in-process testing
            },
            jackett: JackettConfig {
                url: "http://localhost:9117".to_string(),
                api_key: "secret-api-key".to_string(),
                timeout_secs: 30,
            },
            cache: CacheConfig::default(),
            search: SearchConfig {
                fetch_timeout_secs: test_config.fetch_timeout.map(|d| d.as_secs()),
                ..Default::default()
            },
            logging: LoggingConfig::default(),
        };

        let cache = ResultCache::new(
            Arc::clone(&store) as Arc<dyn ResultStore>,
            Duration::from_secs(config.cache.ttl_secs),
        );
        let mut orchestrator =
            SearchOrchestrator::new(Arc::clone(&fetcher) as Arc<dyn Fetcher>, cache)
                .with_trusted_tracker(config.search.trusted_tracker.clone());
        if let Some(timeout) = test_config.fetch_timeout {
            orchestrator = orchestrator.with_fetch_timeout(timeout);
        }

        let state = Arc::new(torrent_search_server::state::AppState::new(
            config,
            Arc::new(orchestrator),
        ));
        let router = torrent_search_server::api::create_router(state);

        Self {
            router,
            fetcher,
            store,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body_bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }
}
