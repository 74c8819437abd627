//! Plain-text rendering of reports and history.

use dealfinder_core::cache::format_timestamp;
use dealfinder_core::{OfferRecord, ReportRow, format_price};

const RULE: &str = "==================================================";
const SEPARATOR: &str = "--------------------";

/// Render the price-sorted batch report.
pub fn render_report(rows: &[ReportRow]) -> String {
    let mut out = format!("{RULE}\nPRICE REPORT (SORTED BY PRICE)\n{RULE}\n");

    if rows.is_empty() {
        out.push_str("No offers were found for the searched titles.\n");
        return out;
    }

    for row in rows {
        out.push_str(&format!(
            "Item: {}\n  -> Best price: {} at {}\n  -> Expires: {}\n  -> Link: {}\n{SEPARATOR}\n",
            row.item_name,
            row.price_display,
            row.store_name,
            row.expiry_display,
            row.offer_url.as_deref().unwrap_or("-"),
        ));
    }
    out
}

/// Render stored batches for one term, one line per offer.
pub fn render_history(term: &str, records: &[OfferRecord]) -> String {
    if records.is_empty() {
        return format!("No history for '{term}'.\n");
    }

    let mut out = format!("History for '{term}' ({} offers)\n", records.len());
    for record in records {
        out.push_str(&format!(
            "{} | {} | {} | {} | {} | {}\n",
            format_timestamp(&record.queried_at),
            record.item_name,
            format_price(record.price),
            record.store_name,
            record.expiry_display,
            record.offer_url.as_deref().unwrap_or("-"),
        ));
    }
    out
}
