//! Aggregation of market probabilities into one recommendation.

use tracing::{debug, instrument};

use crate::market::RawMarket;
use crate::metrics;

use super::classifier::{classify_question, parse_yes_probability, QuestionBias};
use super::types::{Direction, MarketSummary, Recommendation, SignalStrength};

/// YES price used when a market has no usable price.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Strong needs a gap above this...
const STRONG_DIFF: f64 = 0.3;
/// ...and confidence above this.
const STRONG_CONFIDENCE: f64 = 0.7;
/// Moderate needs a gap above this...
const MODERATE_DIFF: f64 = 0.15;
/// ...and confidence above this.
const MODERATE_CONFIDENCE: f64 = 0.6;

/// Bullish and bearish probability samples for one analysis call.
#[derive(Debug, Default)]
struct ProbabilityAccumulator {
    bullish: Vec<f64>,
    bearish: Vec<f64>,
}

impl ProbabilityAccumulator {
    fn record(&mut self, bias: QuestionBias, yes: f64) {
        match bias {
            QuestionBias::Bullish => {
                self.bullish.push(yes);
                self.bearish.push(1.0 - yes);
            }
            QuestionBias::Bearish => {
                self.bearish.push(yes);
                self.bullish.push(1.0 - yes);
            }
            QuestionBias::Unclassified => {}
        }
    }

    fn averages(&self) -> (f64, f64) {
        (
            mean(&self.bullish).unwrap_or(DEFAULT_PROBABILITY),
            mean(&self.bearish).unwrap_or(DEFAULT_PROBABILITY),
        )
    }
}

fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Three decimals, halfway values to the even digit.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

/// Probability as a one-decimal percentage, rounded on the decimal
/// expansion of `value` rather than on `value * 100`.
fn percent(value: f64) -> String {
    match format!("{:.3}", value).replace('.', "").parse::<u64>() {
        Ok(thousandths) => format!("{}.{}", thousandths / 10, thousandths % 10),
        Err(_) => format!("{:.1}", value * 100.0),
    }
}

/// Direction and confidence from the two averages. Exact ties are neutral.
pub fn resolve_direction(avg_bullish: f64, avg_bearish: f64) -> (Direction, f64) {
    if avg_bullish > avg_bearish {
        (Direction::Buy, avg_bullish)
    } else if avg_bearish > avg_bullish {
        (Direction::Sell, avg_bearish)
    } else {
        (Direction::Neutral, 0.5)
    }
}

/// Strength from the gap between averages and the confidence.
///
/// Both thresholds are strict. Never returns [`SignalStrength::None`].
pub fn signal_strength(diff: f64, confidence: f64) -> SignalStrength {
    if diff > STRONG_DIFF && confidence > STRONG_CONFIDENCE {
        SignalStrength::Strong
    } else if diff > MODERATE_DIFF && confidence > MODERATE_CONFIDENCE {
        SignalStrength::Moderate
    } else {
        SignalStrength::Weak
    }
}

/// YES price for a market, falling back to [`DEFAULT_PROBABILITY`].
fn yes_probability(market: &RawMarket) -> f64 {
    match parse_yes_probability(market.outcome_prices.as_deref()) {
        Ok(Some(yes)) => yes,
        Ok(None) => DEFAULT_PROBABILITY,
        Err(e) => {
            debug!(question = %market.question, error = %e, "Using default YES price");
            metrics::inc_price_parse_failures();
            DEFAULT_PROBABILITY
        }
    }
}

/// Analyze markets into a single directional recommendation.
///
/// Stateless: every call builds its own accumulators, so the same input
/// always yields the same output.
#[instrument(skip(markets), fields(count = markets.len()))]
pub fn analyze_markets(markets: &[RawMarket], symbol: &str) -> Recommendation {
    if markets.is_empty() {
        let rec = Recommendation::empty(symbol);
        metrics::inc_recommendations(rec.direction);
        return rec;
    }

    let mut samples = ProbabilityAccumulator::default();
    let mut summaries = Vec::with_capacity(markets.len());

    for market in markets {
        let yes = yes_probability(market);
        samples.record(classify_question(&market.question), yes);

        summaries.push(MarketSummary {
            question: market.question.clone(),
            yes_probability: yes,
            no_probability: 1.0 - yes,
            volume: market.volume.clone(),
            end_date: market.end_date.clone(),
        });
    }

    let (avg_bullish, avg_bearish) = samples.averages();
    let (direction, confidence) = resolve_direction(avg_bullish, avg_bearish);
    let strength = signal_strength((avg_bullish - avg_bearish).abs(), confidence);

    debug!(
        bullish_samples = samples.bullish.len(),
        bearish_samples = samples.bearish.len(),
        avg_bullish,
        avg_bearish,
        %direction,
        %strength,
        "Aggregated market signal"
    );
    metrics::inc_recommendations(direction);

    Recommendation {
        direction,
        confidence: round3(confidence),
        signal_strength: strength,
        markets_analyzed: markets.len(),
        bullish_probability: round3(avg_bullish),
        bearish_probability: round3(avg_bearish),
        summary: format!(
            "Analyzed {} markets for {}. Bullish probability: {}%, Bearish probability: {}%. Recommendation: {} with {} signal.",
            markets.len(),
            symbol,
            percent(avg_bullish),
            percent(avg_bearish),
            direction.to_string().to_uppercase(),
            strength
        ),
        markets: summaries,
    }
}
