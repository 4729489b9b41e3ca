//! Prometheus metrics for the search pipeline.
//!
//! This module provides metrics for:
//! - Result cache (lookups, writes)
//! - Upstream fetches (requests, latency)
//! - Result filtering

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Cache Metrics
// =============================================================================

/// Cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("torrent_search_cache_lookups_total", "Total result cache lookups"),
        &["result"], // "hit", "miss", "error"
    )
    .unwrap()
});

/// Cache writes by status.
pub static CACHE_WRITES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("torrent_search_cache_writes_total", "Total result cache writes"),
        &["status"], // "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Upstream Metrics
// =============================================================================

/// Upstream request duration.
pub static UPSTREAM_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "torrent_search_upstream_duration_seconds",
            "Duration of upstream search calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["fetcher"],
    )
    .unwrap()
});

/// Upstream requests total.
pub static UPSTREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "torrent_search_upstream_requests_total",
            "Total upstream search requests",
        ),
        &["fetcher", "status"], // status: "success", "error", "timeout"
    )
    .unwrap()
});

// =============================================================================
// Result Metrics
// =============================================================================

/// Results kept per fetched query, after filtering.
pub static SEARCH_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "torrent_search_results",
            "Number of filtered results per fetched query",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0]),
    )
    .unwrap()
});

/// Raw records dropped by the filter.
pub static RESULTS_FILTERED_OUT: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "torrent_search_results_filtered_out_total",
        "Total upstream records dropped by the result filter",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Cache
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(CACHE_WRITES.clone()),
        // Upstream
        Box::new(UPSTREAM_DURATION.clone()),
        Box::new(UPSTREAM_REQUESTS.clone()),
        // Results
        Box::new(SEARCH_RESULTS.clone()),
        Box::new(RESULTS_FILTERED_OUT.clone()),
    ]
}
