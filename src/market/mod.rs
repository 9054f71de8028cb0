//! Market module for crypto price-movement prediction markets.
//!
//! This module handles:
//! - Market record and bucket types
//! - Relevance filtering and time-horizon categorization
//! - Gamma API client with timeout retry and optional paging

pub mod client;
pub mod filter;
pub mod types;

pub use client::{GammaClient, GammaConfig};
pub use filter::{categorize, categorize_markets, is_relevant};
pub use types::{CategorizedMarkets, RawMarket, Timeframe};
