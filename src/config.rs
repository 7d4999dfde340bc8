//! Configuration management for taskboard.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.
//! - `TASKBOARD_STORE` - Optional. `sqlite` (default) or `memory`.
//! - `TASKBOARD_DB_PATH` - Optional. SQLite database file. Defaults to `tasks.db`.
//! - `TASKBOARD_STATIC_DIR` - Optional. Directory served under `/static`. Defaults to `static`.
//! - `OPENWEATHER_API_KEY` - Optional. Without it the weather page reports that lookups are unavailable.
//! - `OPENWEATHER_URL` - Optional. Weather endpoint.
//! - `WEATHER_UNITS` - Optional. Defaults to `metric`.
//! - `WEATHER_LANG` - Optional. Defaults to `en`.
//! - `QUOTES_URL` - Optional. Random quote endpoint.
//! - `HTTP_TIMEOUT_SECS` - Optional. Timeout for outbound calls. Defaults to `10`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::store::StoreType;
use crate::util::{env_var_nonempty, env_var_or};

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_QUOTES_URL: &str = "https://zenquotes.io/api/random";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Weather lookup configuration.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// OpenWeather API key (never hardcoded)
    pub api_key: Option<String>,

    pub base_url: String,

    /// `metric`, `imperial` or `standard`
    pub units: String,

    /// Language for the condition description
    pub lang: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_URL.to_string(),
            units: "metric".to_string(),
            lang: "en".to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Storage backend
    pub store_type: StoreType,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Static assets directory
    pub static_dir: PathBuf,

    pub weather: WeatherConfig,

    pub quotes_url: String,

    /// Bound applied to every outbound HTTP call
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            store_type: StoreType::Sqlite,
            db_path: PathBuf::from("tasks.db"),
            static_dir: PathBuf::from("static"),
            weather: WeatherConfig::default(),
            quotes_url: DEFAULT_QUOTES_URL.to_string(),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `PORT` or `HTTP_TIMEOUT_SECS`
    /// is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = env_var_or("PORT", "8000")
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let timeout_secs: u64 = env_var_or("HTTP_TIMEOUT_SECS", "10")
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("HTTP_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;

        let weather = WeatherConfig {
            api_key: env_var_nonempty("OPENWEATHER_API_KEY"),
            base_url: env_var_or("OPENWEATHER_URL", DEFAULT_WEATHER_URL),
            units: env_var_or("WEATHER_UNITS", &defaults.weather.units),
            lang: env_var_or("WEATHER_LANG", &defaults.weather.lang),
        };

        Ok(Self {
            host: env_var_or("HOST", &defaults.host),
            port,
            store_type: StoreType::from_str(&env_var_or("TASKBOARD_STORE", "sqlite")),
            db_path: env_var_nonempty("TASKBOARD_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            static_dir: env_var_nonempty("TASKBOARD_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            weather,
            quotes_url: env_var_or("QUOTES_URL", DEFAULT_QUOTES_URL),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// In-memory configuration with no weather key (useful for testing).
    pub fn in_memory() -> Self {
        Self {
            store_type: StoreType::Memory,
            ..Self::default()
        }
    }
}
