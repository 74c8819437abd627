//! Offer selection: join search hits with price entries and keep the
//! cheapest deal per item.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dealfinder_core::{NO_EXPIRY, OfferRecord};

use crate::itad::{Deal, PriceMap, SearchHit};

/// Display format for deal expiry dates.
const EXPIRY_FORMAT: &str = "%d/%m/%Y";

/// The cheapest deal chosen for one search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedOffer {
    pub item_name: String,
    pub price: f64,
    pub store_name: String,
    pub offer_url: Option<String>,
    pub expiry_display: String,
}

impl SelectedOffer {
    /// Tag the offer with the term and batch timestamp it is stored under.
    pub fn into_record(self, search_term: &str, queried_at: NaiveDateTime) -> OfferRecord {
        OfferRecord {
            search_term: search_term.to_string(),
            item_name: self.item_name,
            price: self.price,
            store_name: self.store_name,
            offer_url: self.offer_url,
            expiry_display: self.expiry_display,
            queried_at,
        }
    }
}

/// Pick the cheapest offer for every hit that has deals.
///
/// Hits without a price entry, or with an empty deal list, are dropped.
pub fn select(hits: &[SearchHit], prices: &PriceMap) -> Vec<SelectedOffer> {
    hits.iter()
        .filter_map(|hit| {
            let deal = cheapest_deal(prices.get(&hit.id)?)?;
            Some(SelectedOffer {
                item_name: hit.title.clone(),
                price: deal.price.amount,
                store_name: deal.shop.name.clone(),
                offer_url: deal.url.clone(),
                expiry_display: format_expiry(deal.expiry.as_deref()),
            })
        })
        .collect()
}

/// Minimum-price deal. On equal prices the first deal in upstream order wins.
pub fn cheapest_deal(deals: &[Deal]) -> Option<&Deal> {
    deals.iter().min_by(|a, b| a.price.amount.total_cmp(&b.price.amount))
}

/// Format a deal expiry as `dd/mm/yyyy` in the timestamp's own offset.
///
/// Missing or blank expiries become the "no expiry" sentinel. Values that
/// are not ISO 8601 are kept verbatim.
pub fn format_expiry(expiry: Option<&str>) -> String {
    let Some(raw) = expiry.map(str::trim).filter(|s| !s.is_empty()) else {
        return NO_EXPIRY.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(EXPIRY_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(EXPIRY_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(EXPIRY_FORMAT).to_string();
    }

    tracing::warn!(expiry = raw, "unrecognized expiry format, keeping raw value");
    raw.to_string()
}
