//! Question bias classification and outcome price parsing.

use std::num::ParseFloatError;

use thiserror::Error;

/// A YES answer to a question containing one of these is bullish.
pub const BULLISH_KEYWORDS: &[&str] = &["ABOVE", "HIGHER", "REACH", "EXCEED"];

/// A YES answer to a question containing one of these is bearish.
pub const BEARISH_KEYWORDS: &[&str] = &["BELOW", "LOWER", "FALL", "DROP"];

/// How a question is phrased relative to price direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionBias {
    /// YES means price goes up.
    Bullish,
    /// YES means price goes down.
    Bearish,
    /// No directional keyword.
    Unclassified,
}

/// Classify a question. Bullish keywords are checked first, so a question
/// with both kinds is bullish.
pub fn classify_question(question: &str) -> QuestionBias {
    let question = question.to_uppercase();

    if BULLISH_KEYWORDS.iter().any(|kw| question.contains(kw)) {
        QuestionBias::Bullish
    } else if BEARISH_KEYWORDS.iter().any(|kw| question.contains(kw)) {
        QuestionBias::Bearish
    } else {
        QuestionBias::Unclassified
    }
}

/// Why an outcome price string could not be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceParseError {
    /// An element is not a number.
    #[error("invalid outcome price {raw:?}: {source}")]
    Invalid {
        /// Offending input.
        raw: String,
        /// Underlying parse error.
        source: ParseFloatError,
    },

    /// The YES price is not a probability.
    #[error("YES price {0} is outside [0, 1]")]
    OutOfRange(f64),
}

/// Parse the YES price from a comma-separated `outcomePrices` string.
///
/// Returns `Ok(None)` when the field is absent or empty.
pub fn parse_yes_probability(outcome_prices: Option<&str>) -> Result<Option<f64>, PriceParseError> {
    let Some(raw) = outcome_prices.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let prices = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|source| PriceParseError::Invalid {
            raw: raw.to_string(),
            source,
        })?;

    match prices.first() {
        Some(&yes) if yes.is_finite() && (0.0..=1.0).contains(&yes) => Ok(Some(yes)),
        Some(&yes) => Err(PriceParseError::OutOfRange(yes)),
        None => Ok(None),
    }
}
