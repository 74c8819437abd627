//! Client code for dealfinder.
//!
//! This crate provides the IsThereAnyDeal API client, the `OfferSource`
//! seam the price pipeline is written against, and the offer selector that
//! reduces raw deals to one cheapest offer per item.

pub mod itad;
pub mod select;
pub mod source;

pub use itad::{Deal, ItadClient, ItadConfig, ItadError, PriceMap, SearchHit};
pub use select::{SelectedOffer, cheapest_deal, format_expiry, select};
pub use source::OfferSource;
