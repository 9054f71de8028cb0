//! Gamma API client for the market catalog.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::MarketError;
use crate::metrics;

use super::filter::categorize_markets;
use super::types::{CategorizedMarkets, RawMarket};

/// Gamma API base URL.
pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

/// Market listing endpoint path.
const MARKETS_PATH: &str = "/markets";

/// Settings for [`GammaClient`].
#[derive(Debug, Clone)]
pub struct GammaConfig {
    /// Base URL for the Gamma API, without trailing slash.
    pub base_url: String,
    /// Total timeout for one request.
    pub timeout: Duration,
    /// Attempts for timeout-class failures, first try included.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Follow `limit`/`offset` pages of this size. `None` fetches one page.
    pub page_size: Option<u32>,
    /// Upper bound on pages followed.
    pub max_pages: u32,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            base_url: GAMMA_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            page_size: None,
            max_pages: 50,
        }
    }
}

impl From<&Config> for GammaConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.api_url().to_string(),
            timeout: config.timeout(),
            max_attempts: config.polymarket_max_attempts,
            retry_delay: config.retry_delay(),
            page_size: config.polymarket_page_size,
            max_pages: config.polymarket_max_pages,
        }
    }
}

/// Client for the Gamma market catalog.
///
/// Owns one pooled HTTP session; it is released when the client is dropped.
#[derive(Debug, Clone)]
pub struct GammaClient {
    http: reqwest::Client,
    config: GammaConfig,
}

impl GammaClient {
    /// Create a client with the given settings.
    pub fn new(config: GammaConfig) -> Result<Self, MarketError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { http, config })
    }

    /// Create a client from application configuration.
    pub fn from_config(config: &Config) -> Result<Self, MarketError> {
        Self::new(GammaConfig::from(config))
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetch open price-movement markets for `symbol`, bucketed by horizon.
    #[instrument(skip(self))]
    pub async fn fetch_crypto_markets(
        &self,
        symbol: &str,
    ) -> Result<CategorizedMarkets, MarketError> {
        if symbol.trim().is_empty() {
            return Err(MarketError::InvalidSymbol(symbol.to_string()));
        }

        let markets = self.fetch_markets().await?;
        let fetched = markets.len();
        let buckets = categorize_markets(markets, symbol);

        metrics::add_markets_relevant(buckets.len());
        info!(
            fetched,
            relevant = buckets.len(),
            hourly = buckets.hourly.len(),
            four_hour = buckets.four_hour.len(),
            daily = buckets.daily.len(),
            weekly = buckets.weekly.len(),
            other = buckets.other.len(),
            "Filtered market catalog"
        );

        Ok(buckets)
    }

    /// Fetch the market catalog in source order.
    ///
    /// Without a page size this is a single request; otherwise pages are
    /// followed until a short page or `max_pages`.
    #[instrument(skip(self))]
    pub async fn fetch_markets(&self) -> Result<Vec<RawMarket>, MarketError> {
        let _timer = metrics::timer_fetch();

        let result = match self.config.page_size {
            None => self.fetch_page(&[]).await,
            Some(page_size) => self.fetch_all_pages(page_size).await,
        };

        match &result {
            Ok(markets) => metrics::add_markets_fetched(markets.len()),
            Err(_) => metrics::inc_fetch_failures(),
        }

        result
    }

    async fn fetch_all_pages(&self, page_size: u32) -> Result<Vec<RawMarket>, MarketError> {
        let mut markets = Vec::new();

        for page in 0..self.config.max_pages {
            let offset = u64::from(page) * u64::from(page_size);
            let query = [
                ("limit", page_size.to_string()),
                ("offset", offset.to_string()),
            ];

            let batch = self.fetch_page(&query).await?;
            let full_page = batch.len() >= page_size as usize;
            debug!(page, offset, received = batch.len(), "Fetched market page");
            markets.extend(batch);

            if !full_page {
                return Ok(markets);
            }
        }

        warn!(
            max_pages = self.config.max_pages,
            received = markets.len(),
            "Stopped paging at page limit, catalog may be truncated"
        );
        Ok(markets)
    }

    /// Fetch one page, retrying timeout-class failures with a fixed delay.
    async fn fetch_page(&self, query: &[(&str, String)]) -> Result<Vec<RawMarket>, MarketError> {
        let url = format!("{}{}", self.config.base_url, MARKETS_PATH);
        let mut attempt = 0;

        loop {
            attempt += 1;
            metrics::inc_fetch_attempts();

            match self.request_page(&url, query).await {
                Ok(markets) => return Ok(markets),
                Err(e) if e.is_timeout() => {
                    metrics::inc_fetch_timeouts();
                    if attempt >= self.config.max_attempts {
                        return Err(MarketError::Timeout {
                            url,
                            attempts: attempt,
                        });
                    }
                    warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        delay_ms = self.config.retry_delay.as_millis() as u64,
                        "Market request timed out, retrying"
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Single request with no retry.
    async fn request_page(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<RawMarket>, MarketError> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::FetchFailed {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                MarketError::ParseError(format!("Failed to parse markets response: {}", e))
            } else {
                MarketError::HttpError(e)
            }
        })?;

        decode_markets(payload)
    }
}

/// Decode a `/markets` payload, skipping entries that are not market objects.
pub fn decode_markets(payload: Value) -> Result<Vec<RawMarket>, MarketError> {
    let Value::Array(entries) = payload else {
        return Err(MarketError::ParseError(
            "expected a JSON array of markets".to_string(),
        ));
    };

    let total = entries.len();
    let markets: Vec<RawMarket> = entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(market) => Some(market),
            Err(e) => {
                debug!(error = %e, "Skipping undecodable market record");
                None
            }
        })
        .collect();

    if markets.len() < total {
        debug!(skipped = total - markets.len(), "Skipped non-market entries");
    }

    Ok(markets)
}
