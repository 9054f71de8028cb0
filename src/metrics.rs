//! Metrics for market retrieval and signal generation.
//!
//! Recording is a no-op until a recorder is installed; the binary installs a
//! Prometheus recorder when asked to dump metrics.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

use crate::signal::Direction;

// === Metric Name Constants ===

/// Market catalog fetch latency metric name.
pub const METRIC_FETCH_LATENCY: &str = "market_fetch_latency_ms";
/// Fetch attempts counter metric name.
pub const METRIC_FETCH_ATTEMPTS: &str = "market_fetch_attempts_total";
/// Fetch timeouts counter metric name.
pub const METRIC_FETCH_TIMEOUTS: &str = "market_fetch_timeouts_total";
/// Fetch failures counter metric name.
pub const METRIC_FETCH_FAILURES: &str = "market_fetch_failures_total";
/// Markets fetched counter metric name.
pub const METRIC_MARKETS_FETCHED: &str = "markets_fetched_total";
/// Markets kept by the relevance filter counter metric name.
pub const METRIC_MARKETS_RELEVANT: &str = "markets_relevant_total";
/// Outcome price parse failures counter metric name.
pub const METRIC_PRICE_PARSE_FAILURES: &str = "outcome_price_parse_failures_total";
/// Recommendations produced counter metric name.
pub const METRIC_RECOMMENDATIONS: &str = "recommendations_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_FETCH_LATENCY,
        "Market catalog fetch latency in milliseconds"
    );

    describe_counter!(
        METRIC_FETCH_ATTEMPTS,
        "Total number of market listing requests sent"
    );
    describe_counter!(
        METRIC_FETCH_TIMEOUTS,
        "Total number of market listing requests that timed out"
    );
    describe_counter!(
        METRIC_FETCH_FAILURES,
        "Total number of market fetches that failed after retries"
    );
    describe_counter!(
        METRIC_MARKETS_FETCHED,
        "Total number of market records received"
    );
    describe_counter!(
        METRIC_MARKETS_RELEVANT,
        "Total number of markets kept by the price-movement filter"
    );
    describe_counter!(
        METRIC_PRICE_PARSE_FAILURES,
        "Total number of outcome prices that fell back to 0.5"
    );
    describe_counter!(
        METRIC_RECOMMENDATIONS,
        "Total number of recommendations produced, by direction"
    );

    debug!("Metrics initialized");
}

/// Increment fetch attempts counter.
pub fn inc_fetch_attempts() {
    counter!(METRIC_FETCH_ATTEMPTS).increment(1);
}

/// Increment fetch timeouts counter.
pub fn inc_fetch_timeouts() {
    counter!(METRIC_FETCH_TIMEOUTS).increment(1);
}

/// Increment fetch failures counter.
pub fn inc_fetch_failures() {
    counter!(METRIC_FETCH_FAILURES).increment(1);
}

/// Add to the markets fetched counter.
pub fn add_markets_fetched(count: usize) {
    counter!(METRIC_MARKETS_FETCHED).increment(count as u64);
}

/// Add to the relevant markets counter.
pub fn add_markets_relevant(count: usize) {
    counter!(METRIC_MARKETS_RELEVANT).increment(count as u64);
}

/// Increment outcome price parse failures counter.
pub fn inc_price_parse_failures() {
    counter!(METRIC_PRICE_PARSE_FAILURES).increment(1);
}

/// Increment recommendations counter for a direction.
pub fn inc_recommendations(direction: Direction) {
    counter!(METRIC_RECOMMENDATIONS, "direction" => direction.to_string()).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for a market catalog fetch.
pub fn timer_fetch() -> LatencyTimer {
    LatencyTimer::new(METRIC_FETCH_LATENCY)
}
