use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use serde::Serialize;
use tokio::time;
use tracing::{debug, error, info};

use common::config::AppConfig;
use common::logger;
use common::request::{DEFAULT_INTERVAL, SignalRequest};
use market_data::ProviderError;
use market_data::remote::HttpClient;
use market_data::services::{AlphaVantageService, TwelveDataService, sources_with_client};
use strategy::AggregatorService;

/// Aggregates forex signals from several providers into one consensus call.
#[derive(Debug, Parser)]
#[command(name = "fxsignals", version, long_about = None)]
struct Args {
    /// Currency pairs, e.g. EURUSD or GBP/JPY
    #[arg(required = true, value_name = "SYMBOL")]
    symbols: Vec<String>,

    /// Candle interval: 1min, 5min, 15min, 30min, 1hour, 4hour or 1day
    #[arg(short, long, default_value = DEFAULT_INTERVAL)]
    interval: String,

    /// Per-provider timeout; overrides PROVIDER_TIMEOUT_SECS
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Also print a real-time Twelve Data quote signal per symbol
    #[arg(long)]
    quote: bool,

    /// Also print the Alpha Vantage spot exchange rate per symbol
    #[arg(long)]
    rate: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}

/// Side lookups run under the same per-provider deadline as the aggregation.
async fn with_deadline<T>(
    deadline: Duration,
    lookup: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, ProviderError> {
    time::timeout(deadline, lookup)
        .await
        .unwrap_or(Err(ProviderError::TimedOut(deadline)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();

    let args = Args::parse();
    debug!("Starting with {:?}", args);

    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(secs) = args.timeout_secs {
        config.provider_timeout = Duration::from_secs(secs);
    }

    // Reject every bad symbol before any provider is called.
    let requests = args
        .symbols
        .iter()
        .map(|symbol| SignalRequest::new(symbol, Some(&args.interval)))
        .collect::<Result<Vec<_>, _>>()?;

    let http = HttpClient::new()?;
    let sources = sources_with_client(&config, &http);
    let aggregator = AggregatorService::new(config.provider_timeout);
    let quotes = args.quote.then(|| {
        TwelveDataService::new(
            http.clone(),
            config.twelve_data_url.clone(),
            config.twelve_data_api_key.clone(),
        )
    });
    let rates = args.rate.then(|| {
        AlphaVantageService::new(
            http.clone(),
            config.alpha_vantage_url.clone(),
            config.alpha_vantage_api_key.clone(),
        )
    });

    info!(
        "Aggregating {} symbol(s) from {} sources, timeout {:?}",
        requests.len(),
        sources.len(),
        config.provider_timeout
    );

    for request in &requests {
        let response = aggregator
            .aggregate(&request.symbol, &request.interval, &sources)
            .await;
        print_json(&response, args.pretty)?;

        if let Some(service) = &quotes {
            let lookup = service.realtime_quote(&request.symbol);
            match with_deadline(config.provider_timeout, lookup).await {
                Ok(quote) => print_json(&quote, args.pretty)?,
                Err(e) => error!("Twelve Data quote for {} failed: {}", request.symbol, e),
            }
        }

        if let Some(service) = &rates {
            let lookup = service.realtime_rate(&request.symbol);
            match with_deadline(config.provider_timeout, lookup).await {
                Ok(rate) => print_json(&rate, args.pretty)?,
                Err(e) => error!("Alpha Vantage exchange rate for {} failed: {}", request.symbol, e),
            }
        }
    }

    Ok(())
}
