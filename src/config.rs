//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Data Source ===
    /// Gamma API base URL.
    #[serde(default = "default_api_url")]
    pub polymarket_api_url: String,

    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub polymarket_timeout: u64,

    // === Retry Policy ===
    /// Attempts for timeout-class failures (first try included).
    #[serde(default = "default_max_attempts")]
    pub polymarket_max_attempts: u32,

    /// Fixed delay between attempts in seconds.
    #[serde(default = "default_retry_delay")]
    pub polymarket_retry_delay_secs: u64,

    // === Pagination ===
    /// Page size for `limit`/`offset` paging. Unset means a single request.
    #[serde(default)]
    pub polymarket_page_size: Option<u32>,

    /// Maximum number of pages followed when paging is enabled.
    #[serde(default = "default_max_pages")]
    pub polymarket_max_pages: u32,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_api_url() -> String {
    "https://gamma-api.polymarket.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    2
}

fn default_max_pages() -> u32 {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            polymarket_api_url: default_api_url(),
            polymarket_timeout: default_timeout(),
            polymarket_max_attempts: default_max_attempts(),
            polymarket_retry_delay_secs: default_retry_delay(),
            polymarket_page_size: None,
            polymarket_max_pages: default_max_pages(),
            rust_log: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.polymarket_api_url).map_err(|e| {
            format!(
                "POLYMARKET_API_URL is not a valid URL ({}): {}",
                self.polymarket_api_url, e
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "POLYMARKET_API_URL must use http or https, got {}",
                url.scheme()
            ));
        }

        if self.polymarket_timeout == 0 {
            return Err("POLYMARKET_TIMEOUT must be at least 1 second".to_string());
        }

        if self.polymarket_max_attempts == 0 {
            return Err("POLYMARKET_MAX_ATTEMPTS must be at least 1".to_string());
        }

        if self.polymarket_page_size == Some(0) {
            return Err("POLYMARKET_PAGE_SIZE must be greater than 0".to_string());
        }

        if self.polymarket_max_pages == 0 {
            return Err("POLYMARKET_MAX_PAGES must be at least 1".to_string());
        }

        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn api_url(&self) -> &str {
        self.polymarket_api_url.trim_end_matches('/')
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.polymarket_timeout)
    }

    /// Retry delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.polymarket_retry_delay_secs)
    }
}
