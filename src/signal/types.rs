//! Signal output types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Recommended trade direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Markets lean bullish.
    Buy,
    /// Markets lean bearish.
    Sell,
    /// No lean, or nothing to analyze.
    Neutral,
}

/// Qualitative strength of a recommendation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SignalStrength {
    /// Only for the empty-input result.
    None,
    /// Small or low-confidence lean.
    Weak,
    /// Clear lean.
    Moderate,
    /// Large, confident lean.
    Strong,
}

/// Per-market view derived during analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    /// Market question text.
    pub question: String,
    /// Parsed YES price in [0, 1].
    pub yes_probability: f64,
    /// `1 - yes_probability`.
    pub no_probability: f64,
    /// Traded volume, as reported.
    pub volume: String,
    /// Resolution timestamp text, as reported.
    pub end_date: String,
}

/// Aggregate directional recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommended direction.
    pub direction: Direction,
    /// Confidence in [0, 1], rounded to 3 decimals.
    pub confidence: f64,
    /// Qualitative strength.
    pub signal_strength: SignalStrength,
    /// Number of markets in the input.
    pub markets_analyzed: usize,
    /// Mean bullish probability, rounded to 3 decimals.
    pub bullish_probability: f64,
    /// Mean bearish probability, rounded to 3 decimals.
    pub bearish_probability: f64,
    /// Human-readable summary.
    pub summary: String,
    /// Per-market views in input order.
    pub markets: Vec<MarketSummary>,
}

impl Recommendation {
    /// Fixed result for an empty market list.
    pub fn empty(symbol: &str) -> Self {
        Self {
            direction: Direction::Neutral,
            confidence: 0.0,
            signal_strength: SignalStrength::None,
            markets_analyzed: 0,
            bullish_probability: 0.5,
            bearish_probability: 0.5,
            summary: format!("No active prediction markets found for {}", symbol),
            markets: Vec::new(),
        }
    }
}
