//! Directional crypto signal from Polymarket prediction markets.
//!
//! Fetches the Gamma market catalog, keeps open markets that ask about a
//! symbol's price, buckets them by time horizon and aggregates their implied
//! probabilities into a buy / sell / neutral recommendation.
//!
//! # Signal
//!
//! A YES price on a bullish-phrased question is a bullish sample and its
//! complement a bearish one; bearish-phrased questions contribute the other
//! way round:
//!
//! ```text
//! "Will ETH be above $4000 by Friday?"  YES 0.80
//! ──────────────────────────────────────────────
//! bullish 0.80 / bearish 0.20 → BUY, strong, confidence 0.80
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Gamma client, relevance filter and horizon buckets
//! - [`signal`]: Question classification and aggregation
//! - [`report`]: Output documents for the CLI
//! - [`metrics`]: Fetch and signal metrics

pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod report;
pub mod signal;

pub use config::Config;
pub use error::{MarketError, Result, SignalError};
pub use market::{CategorizedMarkets, GammaClient, RawMarket, Timeframe};
pub use signal::{analyze_markets, Recommendation};
