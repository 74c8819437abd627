//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DEALFINDER_*)
//! 2. TOML config file (if DEALFINDER_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::{ConfigError, MAX_CACHE_TTL_HOURS};

/// Placeholder values shipped in sample config files. Treated as "no key".
const PLACEHOLDER_KEYS: &[&str] = &["your_api_key", "aqui_vai_a_sua_chave", "sua_chave"];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DEALFINDER_*)
/// 2. TOML config file (if DEALFINDER_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// IsThereAnyDeal API key.
    ///
    /// Set via DEALFINDER_API_KEY environment variable.
    /// Required only by commands that reach the upstream API.
    #[serde(default)]
    pub api_key: Option<String>,

    /// ISO 3166-1 alpha-2 country used for price lookups.
    ///
    /// Set via DEALFINDER_COUNTRY environment variable.
    #[serde(default = "default_country")]
    pub country: String,

    /// Path to the SQLite offer history database.
    ///
    /// Set via DEALFINDER_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL of the upstream API.
    ///
    /// Set via DEALFINDER_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via DEALFINDER_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via DEALFINDER_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of title matches requested per search.
    ///
    /// Set via DEALFINDER_SEARCH_RESULTS environment variable.
    #[serde(default = "default_search_results")]
    pub search_results: u8,

    /// How long a cached batch stays fresh, in hours.
    ///
    /// Set via DEALFINDER_CACHE_TTL_HOURS environment variable.
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: i64,

    /// Pause after each live fetch cycle, in milliseconds.
    ///
    /// Set via DEALFINDER_REQUEST_DELAY_MS environment variable.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

fn default_country() -> String {
    "BR".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./dealfinder.sqlite")
}

fn default_base_url() -> String {
    "https://api.isthereanydeal.com".into()
}

fn default_user_agent() -> String {
    "dealfinder/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_search_results() -> u8 {
    50
}

fn default_cache_ttl_hours() -> i64 {
    24
}

fn default_request_delay_ms() -> u64 {
    1_500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            country: default_country(),
            db_path: default_db_path(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            search_results: default_search_results(),
            cache_ttl_hours: default_cache_ttl_hours(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Freshness window for cached batches.
    ///
    /// Saturates instead of overflowing for values `validate` would reject.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.cache_ttl_hours).unwrap_or(chrono::Duration::MAX)
    }

    /// Pause inserted after each live fetch cycle.
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `DEALFINDER_`
    /// 2. TOML file from `DEALFINDER_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DEALFINDER_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("DEALFINDER_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Return the API key, rejecting blank and placeholder values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no usable key is configured.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !PLACEHOLDER_KEYS.iter().any(|p| key.contains(p)))
            .ok_or_else(|| ConfigError::Missing {
                field: "api_key".into(),
                hint: "Set DEALFINDER_API_KEY environment variable".into(),
            })
    }
}
