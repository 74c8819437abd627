//! Cache freshness window.
//!
//! A term has a fresh batch when its most recent `queried_at` is strictly
//! less than the TTL before "now". The clock is injectable so the 24h
//! boundary can be pinned in tests.

use super::connection::CacheDb;
use super::offers::OfferRecord;
use crate::Error;
use chrono::{Duration, Local, NaiveDateTime, SubsecRound};

/// Source of the current local wall-clock time.
pub trait Clock: Send + Sync {
    /// Current local time, truncated to whole seconds.
    fn now(&self) -> NaiveDateTime;
}

/// The system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(0)
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Whether a batch written at `latest` is still fresh at `now`.
pub fn is_fresh(latest: NaiveDateTime, now: NaiveDateTime, ttl: Duration) -> bool {
    now - latest < ttl
}

/// The single most recent batch for a term, when still fresh.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedBatch {
    pub queried_at: NaiveDateTime,
    pub records: Vec<OfferRecord>,
}

impl CacheDb {
    /// Look up the fresh batch for `term`, if any.
    ///
    /// Returns exactly the records sharing the newest `queried_at`; older
    /// batches are never mixed in.
    pub async fn fresh_batch(
        &self, term: &str, now: NaiveDateTime, ttl: Duration,
    ) -> Result<Option<CachedBatch>, Error> {
        let Some(latest) = self.latest_timestamp(term).await? else {
            return Ok(None);
        };

        if !is_fresh(latest, now, ttl) {
            tracing::debug!(term, %latest, "cached batch is stale");
            return Ok(None);
        }

        let records = self.rows_at(term, latest).await?;
        if records.is_empty() {
            return Ok(None);
        }

        Ok(Some(CachedBatch { queried_at: latest, records }))
    }
}
