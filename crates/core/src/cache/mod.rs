//! SQLite-backed offer history used as the price cache.
//!
//! This module provides a persistent, append-only store using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Batches of offers keyed by normalized search term and timestamp
//! - A TTL freshness window over the newest batch per term
//! - Automatic schema migrations
//! - A watchlist of titles for bulk refreshes

pub mod connection;
pub mod migrations;
pub mod offers;
pub mod watchlist;
pub mod window;

pub use crate::Error;

pub use connection::CacheDb;
pub use offers::{OfferRecord, StoredOffer, TIMESTAMP_FORMAT, format_timestamp, parse_timestamp};
pub use window::{CachedBatch, Clock, FixedClock, LocalClock, is_fresh};
