//! Integration tests for the Polymarket signal generator.
//!
//! The Gamma API is stood in for by a local `wiremock` server, so these run
//! offline: cargo test --test integration

use std::time::Duration;

use polymarket_signal::error::MarketError;
use polymarket_signal::market::{GammaClient, GammaConfig, Timeframe};
use polymarket_signal::report::AnalysisReport;
use polymarket_signal::signal::{analyze_markets, Direction, SignalStrength};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client pointed at the mock server with short timings.
fn test_client(server: &MockServer) -> GammaClient {
    GammaClient::new(GammaConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(200),
        max_attempts: 3,
        retry_delay: Duration::from_millis(10),
        page_size: None,
        max_pages: 10,
    })
    .expect("client builds")
}

fn market(question: &str, prices: &str) -> Value {
    json!({
        "question": question,
        "active": true,
        "closed": false,
        "outcomePrices": prices,
        "volume": "2500.5",
        "endDate": "2026-10-24T00:00:00Z"
    })
}

fn catalog() -> Value {
    json!([
        market("Will ETH be above $3000 in the 3pm hour?", "0.7,0.3"),
        market("Will BTC be above $100k today?", "0.6,0.4"),
        market("Will ETH 4H candle close higher?", "0.55,0.45"),
        market("Will ETH fall below $2500 today?", "0.2,0.8"),
        {
            "question": "Will ETH be above $5000 this week?",
            "active": true,
            "closed": true,
            "outcomePrices": "0.1,0.9"
        },
        market("Will ETH reach $4000 this week?", "0.4,0.6"),
        market("Will ETH ETF inflows top $1B?", "0.5,0.5"),
        market("ETH price at year end above $10k?", "0.15,0.85"),
        "garbage",
        42
    ])
}

async fn mount_catalog(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_crypto_markets_filters_and_buckets() {
    let server = MockServer::start().await;
    mount_catalog(&server, catalog()).await;

    let buckets = assert_ok!(test_client(&server).fetch_crypto_markets("eth").await);

    let questions = |tf: Timeframe| -> Vec<String> {
        buckets.get(tf).iter().map(|m| m.question.clone()).collect()
    };

    assert_eq!(questions(Timeframe::Hourly), vec!["Will ETH be above $3000 in the 3pm hour?"]);
    assert_eq!(questions(Timeframe::FourHour), vec!["Will ETH 4H candle close higher?"]);
    assert_eq!(questions(Timeframe::Daily), vec!["Will ETH fall below $2500 today?"]);
    assert_eq!(questions(Timeframe::Weekly), vec!["Will ETH reach $4000 this week?"]);
    assert_eq!(questions(Timeframe::Other), vec!["ETH price at year end above $10k?"]);
    assert_eq!(buckets.len(), 5);
}

#[tokio::test]
async fn no_matching_markets_yields_empty_buckets() {
    let server = MockServer::start().await;
    mount_catalog(&server, catalog()).await;

    let buckets = assert_ok!(test_client(&server).fetch_crypto_markets("DOGE").await);
    assert!(buckets.is_empty());

    let rec = analyze_markets(&buckets.all(), "DOGE");
    assert_eq!(rec.direction, Direction::Neutral);
    assert_eq!(rec.signal_strength, SignalStrength::None);
    assert_eq!(rec.summary, "No active prediction markets found for DOGE");
}

#[tokio::test]
async fn full_pipeline_produces_report() {
    let server = MockServer::start().await;
    mount_catalog(&server, catalog()).await;

    let buckets = assert_ok!(test_client(&server).fetch_crypto_markets("ETH").await);
    let report = AnalysisReport::build("ETH", &buckets, None);

    let hourly = report.timeframes.hourly.as_ref().unwrap();
    assert_eq!(hourly.direction, Direction::Buy);
    assert_eq!(hourly.confidence, 0.7);

    let daily = report.timeframes.daily.as_ref().unwrap();
    assert_eq!(daily.direction, Direction::Buy);
    assert_eq!(daily.bullish_probability, 0.8);
    assert_eq!(daily.bearish_probability, 0.2);
    assert_eq!(daily.signal_strength, SignalStrength::Strong);

    let weekly = report.timeframes.weekly.as_ref().unwrap();
    assert_eq!(weekly.direction, Direction::Sell);
    assert_eq!(weekly.confidence, 0.6);

    let overall = report.overall.as_ref().unwrap();
    assert_eq!(overall.markets_analyzed, 5);
    assert_eq!(overall.markets[0].question, "Will ETH be above $3000 in the 3pm hour?");
    assert_eq!(overall.markets[0].volume, "2500.5");

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["timeframes"]["4hour"].is_object());
    assert!(json["generated_at"].is_string());
}

#[tokio::test]
async fn timeouts_are_retried_then_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let err = assert_err!(test_client(&server).fetch_crypto_markets("ETH").await);
    match err {
        MarketError::Timeout { attempts, url } => {
            assert_eq!(attempts, 3);
            assert!(url.ends_with("/markets"));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn timeout_then_success_returns_markets() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .expect(1)
        .mount(&server)
        .await;

    let buckets = assert_ok!(test_client(&server).fetch_crypto_markets("ETH").await);
    assert_eq!(buckets.len(), 5);
    assert_eq!(
        buckets.get(Timeframe::Daily)[0].question,
        "Will ETH fall below $2500 today?"
    );
}

#[tokio::test]
async fn http_error_status_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let err = assert_err!(test_client(&server).fetch_markets().await);
    match err {
        MarketError::FetchFailed { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected fetch failure, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = assert_err!(test_client(&server).fetch_markets().await);
    assert_eq!(err.kind(), "malformed_response");
}

#[tokio::test]
async fn non_array_body_is_rejected() {
    let server = MockServer::start().await;
    mount_catalog(&server, json!({"data": []})).await;

    let err = assert_err!(test_client(&server).fetch_markets().await);
    assert!(matches!(err, MarketError::ParseError(_)));
}

#[tokio::test]
async fn paging_follows_offsets_until_short_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            market("Will ETH be above $3000 today?", "0.6,0.4"),
            market("Will ETH be above $3500 today?", "0.4,0.6"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            market("Will ETH be above $4000 today?", "0.2,0.8"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = GammaClient::new(GammaConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(500),
        max_attempts: 1,
        retry_delay: Duration::from_millis(10),
        page_size: Some(2),
        max_pages: 10,
    })
    .unwrap();

    let markets = assert_ok!(client.fetch_markets().await);
    let questions: Vec<&str> = markets.iter().map(|m| m.question.as_str()).collect();
    assert_eq!(
        questions,
        vec![
            "Will ETH be above $3000 today?",
            "Will ETH be above $3500 today?",
            "Will ETH be above $4000 today?",
        ]
    );
}

#[tokio::test]
async fn paging_stops_at_page_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            market("Will ETH be above $3000 today?", "0.6,0.4"),
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let client = GammaClient::new(GammaConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(500),
        max_attempts: 1,
        retry_delay: Duration::from_millis(10),
        page_size: Some(1),
        max_pages: 2,
    })
    .unwrap();

    let markets = assert_ok!(client.fetch_markets().await);
    assert_eq!(markets.len(), 2);
}

#[tokio::test]
async fn single_page_mode_sends_no_paging_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    mount_catalog(&server, json!([market("Will ETH be above $3000 today?", "0.6,0.4")])).await;

    let markets = assert_ok!(test_client(&server).fetch_markets().await);
    assert_eq!(markets.len(), 1);
}
