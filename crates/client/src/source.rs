//! Upstream offer source abstraction.

use crate::itad::{ItadError, PriceMap, SearchHit};

/// The two upstream calls the price pipeline depends on.
///
/// `ItadClient` is the production implementation; the pipeline is generic
/// over this trait so it can be driven by scripted sources.
#[async_trait::async_trait]
pub trait OfferSource: Send + Sync {
    /// Search titles matching a normalized term.
    async fn search_titles(&self, term: &str) -> Result<Vec<SearchHit>, ItadError>;

    /// Fetch current deals for a set of game ids.
    async fn fetch_prices(&self, ids: &[String]) -> Result<PriceMap, ItadError>;
}
