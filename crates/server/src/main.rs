use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use torrent_search_core::{
    load_config, validate_config, CacheBackend, Config, Fetcher, JackettFetcher, LogFormat,
    LoggingConfig, MemoryResultStore, RedisResultStore, ResultCache, ResultStore,
    SearchOrchestrator, SqliteResultStore,
};
use torrent_search_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    // Determine config path
    let config_path = std::env::var("TORRENT_SERVER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Logging is configured from the file, so failures before that go to stderr
    let config = match load_and_validate(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);
    info!("Configuration loaded from {:?}", config_path);

    if let Err(e) = run(config).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_and_validate(config_path: &Path) -> Result<Config> {
    let config = load_config(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let json = logging.format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

async fn run(config: Config) -> Result<()> {
    info!("Jackett URL: {}", config.jackett.url);
    info!("Cache backend: {:?}", config.cache.backend);
    info!("Log format: {:?}", config.logging.format);

    let orchestrator = Arc::new(build_orchestrator(&config)?);

    let state = Arc::new(AppState::new(config.clone(), orchestrator));
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

fn build_orchestrator(config: &Config) -> Result<SearchOrchestrator> {
    let store: Arc<dyn ResultStore> = match config.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryResultStore::new()),
        CacheBackend::Sqlite => Arc::new(
            SqliteResultStore::new(&config.cache.path)
                .context("Failed to open sqlite result cache")?,
        ),
        // Connects lazily; an unreachable server degrades to cache misses
        CacheBackend::Redis => Arc::new(
            RedisResultStore::new(&config.cache.redis_url)
                .context("Invalid redis cache URL")?,
        ),
    };
    info!("Result cache initialized ({})", store.name());

    let fetcher: Arc<dyn Fetcher> = Arc::new(
        JackettFetcher::new(config.jackett.clone()).context("Failed to create Jackett client")?,
    );

    let cache = ResultCache::new(store, Duration::from_secs(config.cache.ttl_secs));
    let mut orchestrator = SearchOrchestrator::new(fetcher, cache)
        .with_trusted_tracker(config.search.trusted_tracker.clone());
    if let Some(secs) = config.search.fetch_timeout_secs {
        orchestrator = orchestrator.with_fetch_timeout(Duration::from_secs(secs));
    }

    Ok(orchestrator)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
