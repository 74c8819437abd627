//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Longest accepted cache freshness window (one year).
pub const MAX_CACHE_TTL_HOURS: i64 = 24 * 365;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `country` is not a two-letter uppercase code
    /// - `base_url` is not an absolute http(s) URL
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `search_results` is 0 or above 100
    /// - `cache_ttl_hours` is not positive or exceeds one year
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Invalid {
                field: "country".into(),
                reason: "must be a two-letter uppercase country code".into(),
            });
        }

        match url::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::Invalid {
                    field: "base_url".into(),
                    reason: "must be an absolute http(s) URL".into(),
                });
            }
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if !(1..=100).contains(&self.search_results) {
            return Err(ConfigError::Invalid { field: "search_results".into(), reason: "must be 1-100".into() });
        }

        if self.cache_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_hours".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.cache_ttl_hours > MAX_CACHE_TTL_HOURS {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_hours".into(),
                reason: format!("must not exceed {MAX_CACHE_TTL_HOURS} hours"),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.request_delay_ms == 0 {
            tracing::warn!("request_delay_ms is 0; upstream requests will not be spaced out");
        }

        Ok(())
    }
}
