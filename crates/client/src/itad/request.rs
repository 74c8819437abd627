//! IsThereAnyDeal request query parameters and validation.

use serde::Serialize;

use crate::itad::ItadError;

/// Query string for `GET /games/search/v1`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery<'a> {
    pub key: &'a str,
    pub title: &'a str,
    pub results: u8,
}

impl SearchQuery<'_> {
    /// Validate the search parameters before sending.
    pub fn validate(&self) -> Result<(), ItadError> {
        if self.title.trim().is_empty() {
            return Err(ItadError::InvalidQuery("title cannot be empty".to_string()));
        }
        if self.results == 0 {
            return Err(ItadError::InvalidQuery("results must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Query string for `POST /games/prices/v3`.
#[derive(Debug, Clone, Serialize)]
pub struct PricesQuery<'a> {
    pub key: &'a str,
    pub country: &'a str,
}

/// Deduplicate ids, keeping first-seen order.
pub fn unique_ids(ids: &[String]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().map(String::as_str).filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_search_query() {
        let query = SearchQuery { key: "k", title: "hades", results: 50 };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_empty_title() {
        let query = SearchQuery { key: "k", title: "  ", results: 50 };
        assert!(matches!(query.validate(), Err(ItadError::InvalidQuery(_))));
    }

    #[test]
    fn test_zero_results() {
        let query = SearchQuery { key: "k", title: "hades", results: 0 };
        assert!(matches!(query.validate(), Err(ItadError::InvalidQuery(_))));
    }

    #[test]
    fn test_unique_ids() {
        let ids = vec!["b".to_string(), "a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(unique_ids(&ids), ["b", "a", "c"]);
    }
}
