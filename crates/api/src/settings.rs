//! Application Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file (`config/default.toml`, or the file named by `RAIN_FORECAST_CONFIG`),
//! then `RAIN_FORECAST__SECTION__KEY` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::rate_limit::RateLimitConfig;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "RAIN_FORECAST_CONFIG";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "RAIN_FORECAST";

const DEFAULT_CONFIG_FILE: &str = "config/default";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the model bundle (`.json`, `.bin` or `.postcard`)
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// Full application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load using `RAIN_FORECAST_CONFIG` if set, else `config/default.*` if present
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_from(path.as_deref())
    }

    /// Load with an explicit config file. An explicit file must exist.
    pub fn load_from(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = File::with_name(path.unwrap_or(DEFAULT_CONFIG_FILE)).required(path.is_some());

        Config::builder()
            .set_default("server.addr", "0.0.0.0:8080")?
            .set_default("model.path", "models/rain_forecast.json")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("rate_limit.enabled", true)?
            .set_default("rate_limit.per_second", 1_i64)?
            .set_default("rate_limit.burst_size", 10_i64)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load_from(None).unwrap();
        assert_eq!(config.model.path, "models/rain_forecast.json");
        assert_eq!(config.logging.level, "info");
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.burst_size, 10);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("rain-forecast-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[server]\naddr = \"127.0.0.1:9000\"\n\n[rate_limit]\nenabled = false\n",
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server.addr, "127.0.0.1:9000");
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.model.path, "models/rain_forecast.json");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(AppConfig::load_from(Some("/nonexistent/rain-forecast.toml")).is_err());
    }
}
