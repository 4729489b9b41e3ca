use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `TORRENT_SERVER_CACHE__TTL_SECS`.
const ENV_PREFIX: &str = "TORRENT_SERVER_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(deployment_env())
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Unprefixed variables existing deployments already export:
/// `JACKETT_API_URL`, `JACKETT_API_KEY` and `REDIS_ADDR`.
fn deployment_env() -> Env {
    Env::raw()
        .only(&["JACKETT_API_URL", "JACKETT_API_KEY", "REDIS_ADDR"])
        .map(|key| {
            let key = key.as_str();
            if key.eq_ignore_ascii_case("JACKETT_API_URL") {
                "jackett.url".into()
            } else if key.eq_ignore_ascii_case("JACKETT_API_KEY") {
                "jackett.api_key".into()
            } else {
                "cache.redis_url".into()
            }
        })
}
