//! IsThereAnyDeal API client.
//!
//! ### Endpoints
//!
//! - **Title search**: `GET {base}/games/search/v1?key&title&results`, returning
//!   `[{id, title, ...}]`.
//! - **Prices**: `POST {base}/games/prices/v3?key&country` with a JSON array of
//!   ids, returning `[{id, deals: [{price: {amount}, shop: {name}, url, expiry}]}]`.
//!
//! The client makes exactly one request per call. Pacing between titles is
//! the caller's job.

pub mod error;
pub mod request;
pub mod response;

pub use error::ItadError;
pub use request::{PricesQuery, SearchQuery};
pub use response::{Deal, DealPrice, PriceEntry, PriceMap, SearchHit, Shop};

use dealfinder_core::AppConfig;
use reqwest::header;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::source::OfferSource;

/// Default base URL for the IsThereAnyDeal API.
const DEFAULT_BASE_URL: &str = "https://api.isthereanydeal.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "dealfinder/0.1";

/// IsThereAnyDeal client configuration.
#[derive(Debug, Clone)]
pub struct ItadConfig {
    pub api_key: String,
    /// Base URL (default: https://api.isthereanydeal.com).
    pub base_url: String,
    /// Country for regional prices (default: BR).
    pub country: String,
    /// Maximum title matches per search (default: 50).
    pub search_results: u8,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ItadConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            country: "BR".to_string(),
            search_results: 50,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TryFrom<&AppConfig> for ItadConfig {
    type Error = ItadError;

    fn try_from(config: &AppConfig) -> Result<Self, Self::Error> {
        let api_key = config.require_api_key().map_err(|_| ItadError::MissingApiKey)?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country: config.country.clone(),
            search_results: config.search_results,
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// IsThereAnyDeal API client.
#[derive(Debug, Clone)]
pub struct ItadClient {
    http: reqwest::Client,
    config: ItadConfig,
}

impl ItadClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ItadConfig) -> Result<Self, ItadError> {
        if config.api_key.is_empty() {
            return Err(ItadError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ItadError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Create a new client from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ItadError> {
        Self::new(ItadConfig::try_from(config)?)
    }

    /// Search titles matching a normalized term.
    ///
    /// An empty match list is `Ok(vec![])`, not an error.
    pub async fn search_titles(&self, term: &str) -> Result<Vec<SearchHit>, ItadError> {
        let query = SearchQuery { key: &self.config.api_key, title: term, results: self.config.search_results };
        query.validate()?;

        let start = Instant::now();
        let url = format!("{}/games/search/v1", self.config.base_url);

        tracing::debug!(term, "searching titles");

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&query)
            .send()
            .await?;

        let hits: Vec<SearchHit> = read_json(response).await?;

        tracing::debug!("title search completed in {:?}, {} hits", start.elapsed(), hits.len());

        Ok(hits)
    }

    /// Fetch current deals for a set of game ids.
    ///
    /// An empty id list returns an empty map without touching the network.
    pub async fn fetch_prices(&self, ids: &[String]) -> Result<PriceMap, ItadError> {
        let ids = request::unique_ids(ids);
        if ids.is_empty() {
            return Ok(PriceMap::new());
        }

        let query = PricesQuery { key: &self.config.api_key, country: &self.config.country };

        let start = Instant::now();
        let url = format!("{}/games/prices/v3", self.config.base_url);

        tracing::debug!(count = ids.len(), country = %self.config.country, "fetching prices");

        let response = self
            .http
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .query(&query)
            .json(&ids)
            .send()
            .await?;

        let entries: Vec<PriceEntry> = read_json(response).await?;

        tracing::debug!("price lookup completed in {:?}, {} entries", start.elapsed(), entries.len());

        Ok(response::into_price_map(entries))
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ItadConfig {
        &self.config
    }
}

/// Check the status and decode a JSON body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ItadError> {
    let status = response.status();
    tracing::debug!("IsThereAnyDeal response status: {}", status);

    if status == 401 || status == 403 {
        return Err(ItadError::AuthError);
    }

    if status == 429 {
        return Err(ItadError::RateLimited);
    }

    if status.is_client_error() || status.is_server_error() {
        return Err(ItadError::HttpError { status: status.as_u16() });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ItadError::Parse(e.to_string()))
}

#[async_trait::async_trait]
impl OfferSource for ItadClient {
    async fn search_titles(&self, term: &str) -> Result<Vec<SearchHit>, ItadError> {
        ItadClient::search_titles(self, term).await
    }

    async fn fetch_prices(&self, ids: &[String]) -> Result<PriceMap, ItadError> {
        ItadClient::fetch_prices(self, ids).await
    }
}
