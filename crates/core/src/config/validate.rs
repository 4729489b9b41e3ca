use super::{
    types::{CacheBackend, Config},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Jackett URL is set
/// - Cache TTL is positive
/// - Trusted tracker is set
/// - Redis URL is set when the redis backend is selected
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.jackett.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "jackett.url cannot be empty".to_string(),
        ));
    }

    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.ttl_secs must be greater than 0".to_string(),
        ));
    }

    if config.search.trusted_tracker.is_empty() {
        return Err(ConfigError::ValidationError(
            "search.trusted_tracker cannot be empty".to_string(),
        ));
    }

    if config.cache.backend == CacheBackend::Redis && config.cache.redis_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "cache.redis_url is required for the redis backend".to_string(),
        ));
    }

    Ok(())
}
