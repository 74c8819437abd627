//! IsThereAnyDeal response types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One match from the title search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
}

/// Price lookup result for one game id.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceEntry {
    pub id: String,
    #[serde(default)]
    pub deals: Vec<Deal>,
}

/// One store's current offer for a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub price: DealPrice,
    pub shop: Shop,
    #[serde(default)]
    pub url: Option<String>,
    /// ISO 8601 end of the deal, null when open-ended.
    #[serde(default)]
    pub expiry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealPrice {
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
}

/// Deals keyed by game id.
pub type PriceMap = HashMap<String, Vec<Deal>>;

/// Index price entries by id. A repeated id keeps its last entry.
pub fn into_price_map(entries: Vec<PriceEntry>) -> PriceMap {
    entries.into_iter().map(|entry| (entry.id, entry.deals)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"[
        {"id": "018d937f-11e7-7289-a6f1-5dca22b4d6d1", "slug": "the-witcher-3-wild-hunt", "title": "The Witcher 3: Wild Hunt", "type": "game", "mature": false},
        {"id": "018d937f-2a2c-70f6-a1b3-c5a6b1f0a4e1", "slug": "the-witcher-3-hearts-of-stone", "title": "The Witcher 3: Hearts of Stone", "type": "dlc", "mature": false}
    ]"#;

    const PRICES_FIXTURE: &str = r#"[
        {
            "id": "018d937f-11e7-7289-a6f1-5dca22b4d6d1",
            "historyLow": {"all": {"amount": 9.99, "currency": "BRL"}},
            "deals": [
                {
                    "shop": {"id": 61, "name": "Steam"},
                    "price": {"amount": 29.9, "amountInt": 2990, "currency": "BRL"},
                    "regular": {"amount": 129.99, "amountInt": 12999, "currency": "BRL"},
                    "cut": 77,
                    "url": "https://itad.link/steam-witcher3",
                    "expiry": "2024-07-11T17:00:00+00:00"
                },
                {
                    "shop": {"id": 35, "name": "GOG"},
                    "price": {"amount": 19.9, "amountInt": 1990, "currency": "BRL"},
                    "url": "https://itad.link/gog-witcher3",
                    "expiry": null
                }
            ]
        },
        {"id": "018d937f-2a2c-70f6-a1b3-c5a6b1f0a4e1", "deals": []}
    ]"#;

    #[test]
    fn test_deserialize_search_hits() {
        let hits: Vec<SearchHit> = serde_json::from_str(SEARCH_FIXTURE).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "The Witcher 3: Wild Hunt");
        assert_eq!(hits[1].id, "018d937f-2a2c-70f6-a1b3-c5a6b1f0a4e1");
    }

    #[test]
    fn test_deserialize_price_entries() {
        let entries: Vec<PriceEntry> = serde_json::from_str(PRICES_FIXTURE).unwrap();
        assert_eq!(entries.len(), 2);

        let deals = &entries[0].deals;
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].shop.name, "Steam");
        assert_eq!(deals[0].price.amount, 29.9);
        assert_eq!(deals[0].expiry.as_deref(), Some("2024-07-11T17:00:00+00:00"));
        assert!(deals[1].expiry.is_none());
        assert!(entries[1].deals.is_empty());
    }

    #[test]
    fn test_missing_optional_fields() {
        let json = r#"[{"id": "a", "deals": [{"price": {"amount": 1.5}, "shop": {"name": "Humble"}}]}, {"id": "b"}]"#;
        let entries: Vec<PriceEntry> = serde_json::from_str(json).unwrap();
        assert!(entries[0].deals[0].url.is_none());
        assert!(entries[0].deals[0].expiry.is_none());
        assert!(entries[1].deals.is_empty());
    }

    #[test]
    fn test_into_price_map() {
        let entries: Vec<PriceEntry> = serde_json::from_str(PRICES_FIXTURE).unwrap();
        let map = into_price_map(entries);
        assert_eq!(map.len(), 2);
        assert_eq!(map["018d937f-11e7-7289-a6f1-5dca22b4d6d1"].len(), 2);
    }
}
