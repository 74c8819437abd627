//! IsThereAnyDeal client error types.

use std::sync::Arc;

/// Errors from the IsThereAnyDeal API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ItadError {
    /// No API key configured.
    #[error("missing API key: DEALFINDER_API_KEY not set")]
    MissingApiKey,

    /// Invalid request parameters.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the upstream API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ItadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ItadError::Timeout } else { ItadError::Network(Arc::new(err)) }
    }
}
