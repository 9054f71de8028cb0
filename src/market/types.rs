//! Market-related types for crypto price-movement prediction markets.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Time horizon a market question refers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString,
)]
pub enum Timeframe {
    /// One-hour questions.
    #[serde(rename = "hourly")]
    #[strum(serialize = "hourly")]
    Hourly,
    /// Four-hour questions.
    #[serde(rename = "4hour")]
    #[strum(serialize = "4hour")]
    FourHour,
    /// Daily questions.
    #[serde(rename = "daily")]
    #[strum(serialize = "daily")]
    Daily,
    /// Weekly questions.
    #[serde(rename = "weekly")]
    #[strum(serialize = "weekly")]
    Weekly,
    /// Anything that matched no horizon keyword.
    #[serde(rename = "other")]
    #[strum(serialize = "other")]
    Other,
}

impl Timeframe {
    /// All buckets in output order.
    pub const ALL: [Timeframe; 5] = [
        Timeframe::Hourly,
        Timeframe::FourHour,
        Timeframe::Daily,
        Timeframe::Weekly,
        Timeframe::Other,
    ];
}

/// Market record as returned by the Gamma `/markets` endpoint.
///
/// Only the fields the signal needs are decoded; unknown fields are ignored.
/// Field decoding is lenient so one odd record never fails a whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMarket {
    /// Market question text.
    #[serde(default, deserialize_with = "lenient_text")]
    pub question: String,
    /// Whether the market is active. Missing means inactive.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub active: Option<bool>,
    /// Whether the market is closed. Missing means closed.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub closed: Option<bool>,
    /// Comma-separated outcome prices ordered `[YES, NO]`.
    #[serde(default, deserialize_with = "text_only")]
    pub outcome_prices: Option<String>,
    /// Traded volume, text-encoded.
    #[serde(default = "default_volume", deserialize_with = "volume_text")]
    pub volume: String,
    /// Resolution timestamp text.
    #[serde(default, deserialize_with = "lenient_text")]
    pub end_date: String,
    /// Market slug.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "text_only"
    )]
    pub slug: Option<String>,
}

impl RawMarket {
    /// Active and not closed.
    pub fn is_open(&self) -> bool {
        self.active.unwrap_or(false) && !self.closed.unwrap_or(true)
    }
}

fn default_volume() -> String {
    "0".to_string()
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn volume_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => default_volume(),
    })
}

fn text_only<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        _ => None,
    })
}

/// Relevant markets bucketed by time horizon.
///
/// All five buckets always exist; each keeps the source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorizedMarkets {
    /// Hourly bucket.
    pub hourly: Vec<RawMarket>,
    /// Four-hour bucket.
    #[serde(rename = "4hour")]
    pub four_hour: Vec<RawMarket>,
    /// Daily bucket.
    pub daily: Vec<RawMarket>,
    /// Weekly bucket.
    pub weekly: Vec<RawMarket>,
    /// Everything else.
    pub other: Vec<RawMarket>,
}

impl CategorizedMarkets {
    /// Markets in one bucket.
    pub fn get(&self, timeframe: Timeframe) -> &[RawMarket] {
        match timeframe {
            Timeframe::Hourly => &self.hourly,
            Timeframe::FourHour => &self.four_hour,
            Timeframe::Daily => &self.daily,
            Timeframe::Weekly => &self.weekly,
            Timeframe::Other => &self.other,
        }
    }

    fn bucket_mut(&mut self, timeframe: Timeframe) -> &mut Vec<RawMarket> {
        match timeframe {
            Timeframe::Hourly => &mut self.hourly,
            Timeframe::FourHour => &mut self.four_hour,
            Timeframe::Daily => &mut self.daily,
            Timeframe::Weekly => &mut self.weekly,
            Timeframe::Other => &mut self.other,
        }
    }

    /// Append a market to the end of a bucket.
    pub fn push(&mut self, timeframe: Timeframe, market: RawMarket) {
        self.bucket_mut(timeframe).push(market);
    }

    /// Buckets in output order.
    pub fn iter(&self) -> impl Iterator<Item = (Timeframe, &[RawMarket])> + '_ {
        Timeframe::ALL.into_iter().map(move |tf| (tf, self.get(tf)))
    }

    /// Total markets across buckets.
    pub fn len(&self) -> usize {
        self.iter().map(|(_, markets)| markets.len()).sum()
    }

    /// Whether every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Union of all buckets, concatenated in bucket order.
    pub fn all(&self) -> Vec<RawMarket> {
        self.iter()
            .flat_map(|(_, markets)| markets.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn timeframe_names_round_trip_through_strum() {
        assert_eq!(Timeframe::FourHour.to_string(), "4hour");
        assert_eq!(Timeframe::from_str("weekly").unwrap(), Timeframe::Weekly);
        assert!(Timeframe::from_str("monthly").is_err());
    }

    #[test]
    fn raw_market_decodes_gamma_fields() {
        let market: RawMarket = serde_json::from_value(serde_json::json!({
            "id": "12345",
            "question": "Will ETH be above $4000 by Friday?",
            "active": true,
            "closed": false,
            "outcomePrices": "0.8,0.2",
            "volume": "10543.2",
            "endDate": "2026-10-23T00:00:00Z",
            "slug": "eth-above-4000"
        }))
        .unwrap();

        assert_eq!(market.question, "Will ETH be above $4000 by Friday?");
        assert_eq!(market.outcome_prices.as_deref(), Some("0.8,0.2"));
        assert_eq!(market.volume, "10543.2");
        assert_eq!(market.end_date, "2026-10-23T00:00:00Z");
        assert!(market.is_open());
    }

    #[test]
    fn raw_market_tolerates_odd_field_types() {
        let market: RawMarket = serde_json::from_value(serde_json::json!({
            "question": null,
            "active": "yes",
            "outcomePrices": ["0.5", "0.5"],
            "volume": 1200.5
        }))
        .unwrap();

        assert_eq!(market.question, "");
        assert_eq!(market.active, None);
        assert_eq!(market.outcome_prices, None);
        assert_eq!(market.volume, "1200.5");
        assert_eq!(market.end_date, "");
        assert!(!market.is_open());
    }

    #[test]
    fn missing_status_counts_as_closed() {
        let market = RawMarket {
            active: Some(true),
            ..RawMarket::default()
        };
        assert!(!market.is_open());
    }

    #[test]
    fn categorized_markets_serialize_all_buckets() {
        let mut buckets = CategorizedMarkets::default();
        buckets.push(
            Timeframe::Daily,
            RawMarket {
                question: "ETH daily close".to_string(),
                ..RawMarket::default()
            },
        );

        let json = serde_json::to_value(&buckets).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);
        assert!(json.get("4hour").is_some());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.get(Timeframe::Daily).len(), 1);
    }

    #[test]
    fn union_follows_bucket_order() {
        let mut buckets = CategorizedMarkets::default();
        let named = |q: &str| RawMarket {
            question: q.to_string(),
            ..RawMarket::default()
        };
        buckets.push(Timeframe::Other, named("other"));
        buckets.push(Timeframe::Hourly, named("hourly"));
        buckets.push(Timeframe::Weekly, named("weekly"));

        let order: Vec<String> = buckets.all().into_iter().map(|m| m.question).collect();
        assert_eq!(order, vec!["hourly", "weekly", "other"]);
    }
}
