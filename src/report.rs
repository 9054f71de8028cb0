//! Output documents printed by the command-line tool.

use serde::Serialize;
use time::OffsetDateTime;

use crate::error::SignalError;
use crate::market::{CategorizedMarkets, RawMarket, Timeframe};
use crate::signal::{analyze_markets, Recommendation};

/// Per-timeframe recommendations; absent buckets are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeframeRecommendations {
    /// Hourly markets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly: Option<Recommendation>,
    /// Four-hour markets.
    #[serde(rename = "4hour", skip_serializing_if = "Option::is_none")]
    pub four_hour: Option<Recommendation>,
    /// Daily markets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<Recommendation>,
    /// Weekly markets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly: Option<Recommendation>,
    /// Uncategorized markets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<Recommendation>,
}

impl TimeframeRecommendations {
    fn set(&mut self, timeframe: Timeframe, rec: Recommendation) {
        let slot = match timeframe {
            Timeframe::Hourly => &mut self.hourly,
            Timeframe::FourHour => &mut self.four_hour,
            Timeframe::Daily => &mut self.daily,
            Timeframe::Weekly => &mut self.weekly,
            Timeframe::Other => &mut self.other,
        };
        *slot = Some(rec);
    }

    /// Recommendation for one timeframe, if computed.
    pub fn get(&self, timeframe: Timeframe) -> Option<&Recommendation> {
        match timeframe {
            Timeframe::Hourly => self.hourly.as_ref(),
            Timeframe::FourHour => self.four_hour.as_ref(),
            Timeframe::Daily => self.daily.as_ref(),
            Timeframe::Weekly => self.weekly.as_ref(),
            Timeframe::Other => self.other.as_ref(),
        }
    }
}

/// Full analysis document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Symbol as requested.
    pub symbol: String,
    /// When the report was built.
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// Relevant markets across all buckets.
    pub total_markets: usize,
    /// Recommendation per bucket.
    pub timeframes: TimeframeRecommendations,
    /// Recommendation over every bucket; only when all timeframes are analyzed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<Recommendation>,
}

impl AnalysisReport {
    /// Analyze one timeframe, or every timeframe plus the union when `None`.
    pub fn build(symbol: &str, buckets: &CategorizedMarkets, only: Option<Timeframe>) -> Self {
        let mut timeframes = TimeframeRecommendations::default();

        for (timeframe, markets) in buckets.iter() {
            if only.is_some_and(|wanted| wanted != timeframe) {
                continue;
            }
            timeframes.set(timeframe, analyze_markets(markets, symbol));
        }

        let overall = only
            .is_none()
            .then(|| analyze_markets(&buckets.all(), symbol));

        Self {
            symbol: symbol.to_string(),
            generated_at: OffsetDateTime::now_utc(),
            total_markets: buckets.len(),
            timeframes,
            overall,
        }
    }
}

/// One sample market in the debug document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSample {
    /// Bucket the market landed in.
    pub timeframe: Timeframe,
    /// The record as fetched.
    #[serde(flatten)]
    pub market: RawMarket,
}

/// Bucket sizes in the debug document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    /// Hourly count.
    pub hourly: usize,
    /// Four-hour count.
    #[serde(rename = "4hour")]
    pub four_hour: usize,
    /// Daily count.
    pub daily: usize,
    /// Weekly count.
    pub weekly: usize,
    /// Other count.
    pub other: usize,
}

/// Debug document: matching markets without analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugReport {
    /// Symbol as requested.
    pub symbol: String,
    /// Relevant markets across all buckets.
    pub total_markets: usize,
    /// Markets per bucket.
    pub counts: BucketCounts,
    /// Up to the requested number of samples, in bucket order.
    pub samples: Vec<MarketSample>,
}

impl DebugReport {
    /// Collect up to `limit` sample markets.
    pub fn build(symbol: &str, buckets: &CategorizedMarkets, limit: usize) -> Self {
        let samples = buckets
            .iter()
            .flat_map(|(timeframe, markets)| {
                markets.iter().map(move |market| MarketSample {
                    timeframe,
                    market: market.clone(),
                })
            })
            .take(limit)
            .collect();

        Self {
            symbol: symbol.to_string(),
            total_markets: buckets.len(),
            counts: BucketCounts {
                hourly: buckets.hourly.len(),
                four_hour: buckets.four_hour.len(),
                daily: buckets.daily.len(),
                weekly: buckets.weekly.len(),
                other: buckets.other.len(),
            },
            samples,
        }
    }
}

/// Body of the error document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable kind.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// Symbol as requested.
    pub symbol: String,
}

/// Error document printed instead of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Error details.
    pub error: ErrorDetail,
}

impl ErrorReport {
    /// Build from any error, using its [`SignalError`] kind when it has one.
    pub fn from_error(err: &anyhow::Error, symbol: &str) -> Self {
        let kind = err
            .chain()
            .find_map(|cause| {
                cause
                    .downcast_ref::<SignalError>()
                    .map(SignalError::kind)
                    .or_else(|| {
                        cause
                            .downcast_ref::<crate::error::MarketError>()
                            .map(|e| e.kind())
                    })
            })
            .unwrap_or("internal");

        Self {
            error: ErrorDetail {
                kind: kind.to_string(),
                message: format!("{:#}", err),
                symbol: symbol.to_string(),
            },
        }
    }
}
