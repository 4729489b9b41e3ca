//! End-to-end tests for the search pipeline: cache-aside flow over real
//! store backends with a mock upstream.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

use torrent_search_core::testing::{fixtures, FailingStore, MockFetcher};
use torrent_search_core::{
    build_cache_key, FetchError, MemoryResultStore, PageRequest, Query, ResultCache,
    ResultStore, SearchError, SearchOrchestrator, SqliteResultStore,
};

fn ubuntu_records() -> Vec<torrent_search_core::RawResult> {
    vec![
        fixtures::raw_result(
            "ubuntu-24.04-desktop-amd64.iso",
            "Internet Archive",
            "magnet:?xt=urn:btih:aaa",
        ),
        fixtures::raw_result("ubuntu-24.04-server-amd64.iso", "1337x", ""),
        fixtures::raw_result(
            "ubuntu-22.04-desktop-amd64.iso",
            "LinuxTracker",
            "magnet:?xt=urn:btih:ccc",
        ),
    ]
}

fn orchestrator(fetcher: &Arc<MockFetcher>, store: Arc<dyn ResultStore>) -> SearchOrchestrator {
    SearchOrchestrator::new(
        Arc::clone(fetcher) as Arc<dyn torrent_search_core::Fetcher>,
        ResultCache::new(store, Duration::from_secs(3600)),
    )
}

async fn run_ubuntu_scenario(store: Arc<dyn ResultStore>) {
    let fetcher = Arc::new(MockFetcher::new());
    fetcher.set_results(ubuntu_records()).await;
    let orch = orchestrator(&fetcher, Arc::clone(&store));

    let query = Query::new("ubuntu", [2, 1], false).unwrap();
    let key = build_cache_key(&query);
    assert!(assert_ok!(store.get(&key).await).is_none());

    // Miss: fetch, drop the record without a magnet, cache, paginate.
    let page = assert_ok!(orch.search(&query, PageRequest::default()).await);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_items, 2);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 20);
    assert_eq!(page.items[0].title, "ubuntu-24.04-desktop-amd64.iso");
    assert_eq!(page.items[1].title, "ubuntu-22.04-desktop-amd64.iso");
    assert_eq!(fetcher.call_count().await, 1);
    assert!(assert_ok!(store.get(&key).await).is_some());

    // Hit: same answer without touching upstream, regardless of category order.
    let reordered = Query::new("ubuntu", [1, 2], false).unwrap();
    let again = assert_ok!(orch.search(&reordered, PageRequest::default()).await);
    assert_eq!(again, page);
    assert_eq!(fetcher.call_count().await, 1);

    let fetches = fetcher.recorded_fetches().await;
    assert_eq!(fetches[0].text, "ubuntu");
    assert_eq!(fetches[0].categories, vec![1, 2]);
}

#[tokio::test]
async fn test_ubuntu_scenario_memory_store() {
    run_ubuntu_scenario(Arc::new(MemoryResultStore::new())).await;
}

#[tokio::test]
async fn test_ubuntu_scenario_sqlite_store() {
    let dir = TempDir::new().unwrap();
    let store = SqliteResultStore::new(&dir.path().join("cache.db")).unwrap();
    run_ubuntu_scenario(Arc::new(store)).await;
}

#[tokio::test]
async fn test_safe_mode_end_to_end() {
    let fetcher = Arc::new(MockFetcher::new());
    fetcher.set_results(ubuntu_records()).await;
    let orch = orchestrator(&fetcher, Arc::new(MemoryResultStore::new()));

    let query = Query::new("ubuntu", [1], true).unwrap();
    let page = assert_ok!(orch.search(&query, PageRequest::default()).await);

    assert_eq!(page.items.len(), 1);
    assert!(page.items.iter().all(|r| r.tracker == "Internet Archive"));
}

#[tokio::test]
async fn test_expired_entry_triggers_refetch() {
    let fetcher = Arc::new(MockFetcher::new());
    fetcher.set_results(ubuntu_records()).await;
    let orch = SearchOrchestrator::new(
        Arc::clone(&fetcher) as Arc<dyn torrent_search_core::Fetcher>,
        ResultCache::new(
            Arc::new(MemoryResultStore::new()),
            Duration::from_millis(30),
        ),
    );
    let query = Query::new("ubuntu", [1], false).unwrap();

    assert_ok!(orch.results(&query).await);
    assert_ok!(orch.results(&query).await);
    assert_eq!(fetcher.call_count().await, 1);

    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_ok!(orch.results(&query).await);
    assert_eq!(fetcher.call_count().await, 2);
}

#[tokio::test]
async fn test_upstream_failure_caches_nothing() {
    let fetcher = Arc::new(MockFetcher::new());
    fetcher
        .set_next_error(FetchError::ApiError("HTTP 500".to_string()))
        .await;
    let store: Arc<dyn ResultStore> = Arc::new(MemoryResultStore::new());
    let orch = orchestrator(&fetcher, Arc::clone(&store));

    let query = Query::new("ubuntu", [1], false).unwrap();
    let err = assert_err!(orch.search(&query, PageRequest::default()).await);
    assert!(matches!(err, SearchError::Upstream(FetchError::ApiError(_))));
    assert_eq!(assert_ok!(store.entry_count().await), 0);
}

#[tokio::test]
async fn test_unreachable_store_still_serves() {
    let fetcher = Arc::new(MockFetcher::new());
    fetcher.set_results(ubuntu_records()).await;
    let store = Arc::new(FailingStore::new());
    let orch = orchestrator(&fetcher, Arc::clone(&store) as Arc<dyn ResultStore>);

    let query = Query::new("ubuntu", [1], false).unwrap();
    let page = assert_ok!(orch.search(&query, PageRequest::default()).await);
    assert_eq!(page.items.len(), 2);

    // One failed read and one failed write.
    assert_eq!(store.attempts(), 2);
}

#[tokio::test]
async fn test_concurrent_misses_store_a_consistent_set() {
    let fetcher = Arc::new(MockFetcher::new());
    fetcher.set_results(ubuntu_records()).await;
    fetcher.set_delay(Duration::from_millis(20)).await;
    let store: Arc<dyn ResultStore> = Arc::new(MemoryResultStore::new());
    let orch = Arc::new(orchestrator(&fetcher, Arc::clone(&store)));
    let query = Query::new("ubuntu", [3, 1, 2], false).unwrap();

    let requests = (0..8).map(|_| {
        let orch = Arc::clone(&orch);
        let query = query.clone();
        tokio::spawn(async move { orch.results(&query).await })
    });
    let outcomes = futures::future::join_all(requests).await;

    for outcome in outcomes {
        let results = outcome.unwrap().unwrap();
        assert_eq!(results.len(), 2);
    }

    // Redundant fetches are allowed, but the cached entry is one whole set.
    assert!(fetcher.call_count().await >= 1);
    assert_eq!(assert_ok!(store.entry_count().await), 1);
    let cached = orch.cache().get(&build_cache_key(&query)).await.unwrap();
    assert_eq!(cached.len(), 2);
}

#[tokio::test]
async fn test_dropped_request_aborts_fetch() {
    let fetcher = Arc::new(MockFetcher::new());
    fetcher.set_results(ubuntu_records()).await;
    fetcher.set_delay(Duration::from_secs(5)).await;
    let store: Arc<dyn ResultStore> = Arc::new(MemoryResultStore::new());
    let orch = orchestrator(&fetcher, Arc::clone(&store));
    let query = Query::new("ubuntu", [1], false).unwrap();

    // A caller deadline cancels the in-flight fetch; nothing gets cached.
    let outcome =
        tokio::time::timeout(Duration::from_millis(20), orch.results(&query)).await;
    assert!(outcome.is_err());
    assert_eq!(fetcher.call_count().await, 1);
    assert_eq!(assert_ok!(store.entry_count().await), 0);
}
