//! Polymarket crypto signal command-line entry point.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use polymarket_signal::config::Config;
use polymarket_signal::error::{MarketError, SignalError};
use polymarket_signal::market::{GammaClient, Timeframe};
use polymarket_signal::metrics;
use polymarket_signal::report::{AnalysisReport, DebugReport, ErrorReport};

/// Directional crypto signal from Polymarket prediction markets.
#[derive(Parser, Debug)]
#[command(name = "polymarket-signal")]
#[command(about = "Buy/sell/neutral signal from Polymarket crypto price markets")]
#[command(version)]
struct Args {
    /// Crypto symbol (ETH, BTC, SOL, etc.).
    #[arg(short, long, env = "SIGNAL_SYMBOL", default_value = "ETH")]
    symbol: String,

    /// Timeframe to analyze.
    #[arg(short, long, value_enum, default_value_t = TimeframeArg::All)]
    timeframe: TimeframeArg,

    /// Print sample matching markets instead of analyzing them.
    #[arg(long)]
    debug: bool,

    /// Number of sample markets printed with --debug.
    #[arg(long, default_value_t = 5)]
    samples: usize,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,

    /// Print Prometheus metrics to stderr after the run.
    #[arg(long)]
    metrics: bool,
}

/// Timeframe selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TimeframeArg {
    Hourly,
    #[value(name = "4hour")]
    FourHour,
    Daily,
    Weekly,
    All,
}

impl TimeframeArg {
    fn timeframe(self) -> Option<Timeframe> {
        match self {
            TimeframeArg::Hourly => Some(Timeframe::Hourly),
            TimeframeArg::FourHour => Some(Timeframe::FourHour),
            TimeframeArg::Daily => Some(Timeframe::Daily),
            TimeframeArg::Weekly => Some(Timeframe::Weekly),
            TimeframeArg::All => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration before logging so RUST_LOG from .env applies
    let config = Config::load();
    let level = config
        .as_ref()
        .map(|c| c.rust_log.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&level, args.verbose, args.json_logs);

    let prometheus = if args.metrics {
        install_prometheus()
    } else {
        None
    };
    metrics::init_metrics();

    let outcome = match config {
        Ok(config) => run(&args, config).await,
        Err(e) => Err(anyhow::Error::new(SignalError::from(e)).context("Failed to load configuration")),
    };

    let code = match outcome {
        Ok(document) => {
            println!("{}", document);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            print_json(&ErrorReport::from_error(&e, &args.symbol));
            ExitCode::FAILURE
        }
    };

    if let Some(handle) = prometheus {
        eprintln!("{}", handle.render());
    }

    code
}

/// Fetch, bucket and either analyze or sample the markets.
async fn run(args: &Args, config: Config) -> anyhow::Result<String> {
    config.validate().map_err(SignalError::InvalidConfig)?;

    let symbol = args.symbol.trim();
    if symbol.is_empty() {
        return Err(MarketError::InvalidSymbol(args.symbol.clone()).into());
    }

    info!(symbol, base_url = %config.api_url(), "Fetching Polymarket markets");

    let buckets = {
        let client = GammaClient::from_config(&config)?;
        client
            .fetch_crypto_markets(symbol)
            .await
            .with_context(|| format!("Failed to fetch markets for {}", symbol))?
    };

    let document = if args.debug {
        serde_json::to_string_pretty(&DebugReport::build(symbol, &buckets, args.samples))?
    } else {
        let report = AnalysisReport::build(symbol, &buckets, args.timeframe.timeframe());
        if let Some(overall) = &report.overall {
            info!(
                direction = %overall.direction,
                strength = %overall.signal_strength,
                confidence = overall.confidence,
                "Overall recommendation"
            );
        }
        serde_json::to_string_pretty(&report)?
    };

    Ok(document)
}

fn init_logging(level: &str, verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("polymarket_signal=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    // stdout carries the JSON document, logs go to stderr
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn install_prometheus() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to install metrics recorder: {}", e);
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}
