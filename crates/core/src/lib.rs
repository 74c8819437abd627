//! Core types and shared functionality for dealfinder.
//!
//! This crate provides:
//! - Title normalization for cache keys
//! - Offer history cache with SQLite backend
//! - Report rows and price display helpers
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod normalize;
pub mod report;

pub use cache::{CacheDb, CachedBatch, Clock, FixedClock, LocalClock, OfferRecord, StoredOffer};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use normalize::normalize;
pub use report::{NO_EXPIRY, ReportRow, format_price, sort_by_price};
