//! Unified error types for the signal generator.

use thiserror::Error;

/// Unified error type for the signal generator.
#[derive(Error, Debug)]
pub enum SignalError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Market retrieval error.
    #[error("market error: {0}")]
    Market(#[from] MarketError),
}

impl SignalError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalError::Config(_) | SignalError::InvalidConfig(_) => "invalid_config",
            SignalError::Market(e) => e.kind(),
        }
    }
}

/// Market retrieval errors.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Symbol is empty or whitespace.
    #[error("invalid symbol {0:?}: expected a non-empty ticker such as ETH or BTC")]
    InvalidSymbol(String),

    /// Every attempt timed out.
    #[error("request to {url} timed out after {attempts} attempt(s)")]
    Timeout {
        /// Endpoint that timed out.
        url: String,
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Endpoint answered with a non-success status.
    #[error("failed to fetch {url}: HTTP {status}: {body}")]
    FetchFailed {
        /// Endpoint that failed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Failed to parse market data.
    #[error("failed to parse market data: {0}")]
    ParseError(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl MarketError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MarketError::InvalidSymbol(_) => "invalid_symbol",
            MarketError::Timeout { .. } => "fetch_timeout",
            MarketError::FetchFailed { .. } => "fetch_failed",
            MarketError::ParseError(_) => "malformed_response",
            MarketError::HttpError(_) => "transport_failed",
        }
    }

    /// Whether the failure is timeout-class and may be retried.
    pub fn is_timeout(&self) -> bool {
        matches!(self, MarketError::HttpError(e) if e.is_timeout())
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, SignalError>;
