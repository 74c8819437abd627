//! Report rows and price display helpers.

use serde::{Deserialize, Serialize};

use crate::cache::OfferRecord;

/// Currency prefix used in price displays.
pub const CURRENCY_PREFIX: &str = "R$";

/// Expiry display used when a deal has no end date.
pub const NO_EXPIRY: &str = "no expiry";

/// One line of the batch report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub item_name: String,
    pub price_display: String,
    pub store_name: String,
    pub expiry_display: String,
    pub offer_url: Option<String>,
}

impl ReportRow {
    /// Numeric price parsed back out of `price_display`.
    ///
    /// Unparseable displays sort as 0.0.
    pub fn price_value(&self) -> f64 {
        parse_price_display(&self.price_display).unwrap_or(0.0)
    }
}

impl From<&OfferRecord> for ReportRow {
    fn from(record: &OfferRecord) -> Self {
        Self {
            item_name: record.item_name.clone(),
            price_display: format_price(record.price),
            store_name: record.store_name.clone(),
            expiry_display: record.expiry_display.clone(),
            offer_url: record.offer_url.clone(),
        }
    }
}

/// Format an amount as `R$` followed by two decimals.
pub fn format_price(amount: f64) -> String {
    format!("{CURRENCY_PREFIX}{amount:.2}")
}

/// Parse a price display such as `R$19.90` or `R$19,90`.
pub fn parse_price_display(display: &str) -> Option<f64> {
    let digits = display.trim().trim_start_matches(CURRENCY_PREFIX).trim().replace(',', ".");
    digits.parse().ok()
}

/// Stable sort by ascending numeric price.
pub fn sort_by_price(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| a.price_value().total_cmp(&b.price_value()));
}
