//! Cache-or-fetch price pipeline.
//!
//! For each title: normalize, serve the fresh cached batch if there is one,
//! otherwise search upstream, fetch prices, keep the cheapest deal per item,
//! store the batch under the normalized term and return it. All rows are
//! combined and sorted by price at the end.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDateTime;
use dealfinder_client::{OfferSource, PriceMap, select};
use dealfinder_core::{AppConfig, CacheDb, Clock, Error, OfferRecord, ReportRow, normalize, sort_by_price};

/// Which upstream call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Search,
    Prices,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::Search => f.write_str("title search"),
            FetchStage::Prices => f.write_str("price lookup"),
        }
    }
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    Checking { count: usize },
    CacheHit { term: String, queried_at: NaiveDateTime, count: usize },
    Searching { term: String },
    NothingFound { term: String },
    Found { term: String, count: usize },
    FetchingPrices { count: usize },
    Saved { term: String, count: usize },
    NetworkError { term: String, stage: FetchStage, reason: String },
    TermFailed { term: String, reason: String },
    Complete { offers: usize },
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::Checking { count } => write!(f, "Checking {count} title(s)..."),
            StatusEvent::CacheHit { term, queried_at, .. } => write!(
                f,
                "-> Results for '{term}' found in history (from {}). Using cache.",
                queried_at.format("%d/%m at %H:%M")
            ),
            StatusEvent::Searching { term } => write!(f, "Searching for '{term}'..."),
            StatusEvent::NothingFound { term } => write!(f, "-> No items found for '{term}'."),
            StatusEvent::Found { count, .. } => write!(f, "-> Found {count} related items."),
            StatusEvent::FetchingPrices { count } => write!(f, "-> Fetching prices for {count} items..."),
            StatusEvent::Saved { count, .. } => write!(f, "-> {count} offers found and saved."),
            StatusEvent::NetworkError { term, stage, reason } => {
                write!(f, "-> NETWORK ERROR during {stage} for '{term}': {reason}")
            }
            StatusEvent::TermFailed { term, reason } => write!(f, "ERROR processing '{term}': {reason}"),
            StatusEvent::Complete { .. } => f.write_str("Update complete."),
        }
    }
}

/// Tunables for a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    /// How long a cached batch stays fresh.
    pub cache_ttl: chrono::Duration,
    /// Pause after each live fetch cycle.
    pub request_delay: Duration,
}

impl From<&AppConfig> for PipelineSettings {
    fn from(config: &AppConfig) -> Self {
        Self { cache_ttl: config.cache_ttl(), request_delay: config.request_delay() }
    }
}

/// Sequential cache-or-fetch pipeline over a list of titles.
pub struct PricePipeline<S, C> {
    db: CacheDb,
    source: S,
    clock: C,
    settings: PipelineSettings,
}

impl<S: OfferSource, C: Clock> PricePipeline<S, C> {
    pub fn new(db: CacheDb, source: S, clock: C, settings: PipelineSettings) -> Self {
        Self { db, source, clock, settings }
    }

    /// Process every title in order and return the combined rows sorted by price.
    ///
    /// A failure on one title is reported through `on_status` and never
    /// stops the remaining titles.
    pub async fn run(&self, titles: &[String], on_status: &mut dyn FnMut(StatusEvent)) -> Vec<ReportRow> {
        emit(on_status, StatusEvent::Checking { count: titles.len() });

        let mut rows = Vec::new();
        for raw in titles {
            let term = normalize(raw);
            if term.is_empty() {
                tracing::debug!(raw = raw.as_str(), "skipping empty title");
                continue;
            }

            match self.cached_rows(&term).await {
                Ok(Some((queried_at, cached))) => {
                    emit(on_status, StatusEvent::CacheHit { term, queried_at, count: cached.len() });
                    rows.extend(cached);
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    emit(on_status, StatusEvent::TermFailed { term, reason: e.to_string() });
                    continue;
                }
            }

            match self.fetch_live(&term, on_status).await {
                Ok(fetched) => rows.extend(fetched),
                Err(e) => emit(on_status, StatusEvent::TermFailed { term, reason: e.to_string() }),
            }

            if !self.settings.request_delay.is_zero() {
                tokio::time::sleep(self.settings.request_delay).await;
            }
        }

        sort_by_price(&mut rows);
        emit(on_status, StatusEvent::Complete { offers: rows.len() });
        rows
    }

    async fn cached_rows(&self, term: &str) -> Result<Option<(NaiveDateTime, Vec<ReportRow>)>, Error> {
        let batch = self.db.fresh_batch(term, self.clock.now(), self.settings.cache_ttl).await?;
        Ok(batch.map(|b| (b.queried_at, b.records.iter().map(ReportRow::from).collect())))
    }

    /// Search, price, select and store one term.
    ///
    /// Upstream failures are reported and yield no rows. Only storage
    /// failures are returned as errors.
    async fn fetch_live(&self, term: &str, on_status: &mut dyn FnMut(StatusEvent)) -> Result<Vec<ReportRow>, Error> {
        emit(on_status, StatusEvent::Searching { term: term.to_string() });

        let hits = match self.source.search_titles(term).await {
            Ok(hits) => hits,
            Err(e) => {
                emit(
                    on_status,
                    StatusEvent::NetworkError { term: term.to_string(), stage: FetchStage::Search, reason: e.to_string() },
                );
                return Ok(Vec::new());
            }
        };

        if hits.is_empty() {
            emit(on_status, StatusEvent::NothingFound { term: term.to_string() });
            return Ok(Vec::new());
        }
        emit(on_status, StatusEvent::Found { term: term.to_string(), count: hits.len() });

        let ids: Vec<String> = hits.iter().map(|hit| hit.id.clone()).collect();
        emit(on_status, StatusEvent::FetchingPrices { count: ids.len() });

        let prices = match self.source.fetch_prices(&ids).await {
            Ok(prices) => prices,
            Err(e) => {
                emit(
                    on_status,
                    StatusEvent::NetworkError { term: term.to_string(), stage: FetchStage::Prices, reason: e.to_string() },
                );
                PriceMap::new()
            }
        };

        let queried_at = self.clock.now();
        let records: Vec<OfferRecord> =
            select(&hits, &prices).into_iter().map(|offer| offer.into_record(term, queried_at)).collect();

        self.db.append_batch(&records).await?;
        emit(on_status, StatusEvent::Saved { term: term.to_string(), count: records.len() });

        Ok(records.iter().map(ReportRow::from).collect())
    }
}

/// Mirror an event to the log, then hand it to the sink.
fn emit(on_status: &mut dyn FnMut(StatusEvent), event: StatusEvent) {
    match &event {
        StatusEvent::NetworkError { .. } | StatusEvent::TermFailed { .. } => tracing::warn!("{event}"),
        _ => tracing::info!("{event}"),
    }
    on_status(event);
}
