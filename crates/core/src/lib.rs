pub mod cache;
pub mod config;
pub mod fetcher;
pub mod metrics;
pub mod search;
pub mod testing;

pub use cache::{
    MemoryResultStore, RedisResultStore, ResultCache, ResultStore, SqliteResultStore, StoreError,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheBackend, CacheConfig, Config,
    ConfigError, JackettConfig, LogFormat, LoggingConfig, SanitizedConfig, SearchConfig,
    ServerConfig,
};
pub use fetcher::{FetchError, Fetcher, JackettFetcher};
pub use search::{
    build_cache_key, filter_results, paginate, FilteredResult, Page, PageRequest, Query,
    QueryError, RawResult, SearchError, SearchOrchestrator,
};
