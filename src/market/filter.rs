//! Relevance filter and time-horizon categorization for market questions.
//!
//! All matching is plain substring search on the uppercased question, so a
//! symbol like `ETH` also matches `TETHER`.

use tracing::debug;

use super::types::{CategorizedMarkets, RawMarket, Timeframe};

/// A question must mention at least one of these to count as a price market.
pub const PRICE_KEYWORDS: &[&str] = &[
    "PRICE", "ABOVE", "BELOW", "REACH", "HIGHER", "LOWER", "CLOSE",
];

/// One row of the categorization table.
#[derive(Debug, Clone, Copy)]
pub struct TimeframeRule {
    /// Bucket assigned on match.
    pub timeframe: Timeframe,
    /// Any of these marks a match.
    pub keywords: &'static [&'static str],
    /// Longer phrases owned by a later rule, blanked out before matching.
    pub masked: &'static [&'static str],
}

impl TimeframeRule {
    /// Whether an uppercased question matches this rule.
    pub fn matches(&self, question_upper: &str) -> bool {
        let mut text = question_upper.to_string();
        for phrase in self.masked {
            text = text.replace(phrase, " ");
        }
        self.keywords.iter().any(|kw| text.contains(kw))
    }
}

/// Categorization rules, evaluated in order; the first match wins.
pub const TIMEFRAME_RULES: &[TimeframeRule] = &[
    TimeframeRule {
        timeframe: Timeframe::Hourly,
        keywords: &["HOUR", "HOURLY", "1H", "1 HOUR"],
        masked: &["24 HOUR", "24-HOUR", "24H", "4 HOUR", "4-HOUR", "4H"],
    },
    TimeframeRule {
        timeframe: Timeframe::FourHour,
        keywords: &["4 HOUR", "4H", "4-HOUR"],
        masked: &["24 HOUR", "24-HOUR", "24H"],
    },
    TimeframeRule {
        timeframe: Timeframe::Daily,
        keywords: &["DAY", "DAILY", "24H", "24 HOUR", "TODAY", "TOMORROW"],
        masked: &["7 DAY"],
    },
    TimeframeRule {
        timeframe: Timeframe::Weekly,
        keywords: &["WEEK", "WEEKLY", "7 DAY"],
        masked: &[],
    },
];

/// Whether a market is open and asks about the symbol's price.
///
/// `symbol_upper` must already be uppercased.
pub fn is_relevant(market: &RawMarket, symbol_upper: &str) -> bool {
    if !market.is_open() {
        return false;
    }

    let question = market.question.to_uppercase();
    question.contains(symbol_upper) && PRICE_KEYWORDS.iter().any(|kw| question.contains(kw))
}

/// Pick the time horizon for a question.
pub fn categorize(question: &str) -> Timeframe {
    let question = question.to_uppercase();
    TIMEFRAME_RULES
        .iter()
        .find(|rule| rule.matches(&question))
        .map(|rule| rule.timeframe)
        .unwrap_or(Timeframe::Other)
}

/// Keep relevant markets and bucket them, preserving source order.
pub fn categorize_markets<I>(markets: I, symbol: &str) -> CategorizedMarkets
where
    I: IntoIterator<Item = RawMarket>,
{
    let symbol_upper = symbol.to_uppercase();
    let mut buckets = CategorizedMarkets::default();

    for market in markets {
        if !is_relevant(&market, &symbol_upper) {
            continue;
        }
        let timeframe = categorize(&market.question);
        debug!(question = %market.question, %timeframe, "Relevant market");
        buckets.push(timeframe, market);
    }

    buckets
}
