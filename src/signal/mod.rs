//! Signal module: turns market prices into a directional recommendation.
//!
//! This module handles:
//! - Bullish/bearish question classification
//! - Outcome price parsing with a safe default
//! - Aggregation into direction, confidence and strength

pub mod aggregator;
pub mod classifier;
pub mod types;

pub use aggregator::{analyze_markets, resolve_direction, signal_strength};
pub use classifier::{classify_question, parse_yes_probability, QuestionBias};
pub use types::{Direction, MarketSummary, Recommendation, SignalStrength};
