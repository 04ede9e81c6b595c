use async_trait::async_trait;
use chrono::Utc;
use common::models::{PriceSeriesPayload, Provider, SourcePayload, SourceResult};
use common::sources::SignalSource;
use serde::Serialize;
use tracing::{debug, error};
use url::Url;

use crate::analysis::intraday_signals;
use crate::error::ProviderError;
use crate::remote::{ExchangeRateResponse, HttpClient, IntradayResponse, compact_symbol};
use crate::traits::RemoteResponse;

/// Candles kept in the payload.
const MAX_DATA_POINTS: usize = 50;

const RATE_NOTE: &str = "Basic signal generation. Use intraday data for more accurate signals.";

/// Spot exchange rate. A single rate carries no trend, so the call is always
/// NEUTRAL with LOW confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRateSignal {
    pub source: String,
    pub symbol: String,
    pub from_currency: String,
    pub to_currency: String,
    pub exchange_rate: f64,
    pub last_refreshed: String,
    pub timezone: String,
    pub recommendation: String,
    pub confidence: String,
    pub note: String,
}

pub struct AlphaVantageService {
    http: HttpClient,
    base_url: Url,
    api_key: String,
}

impl AlphaVantageService {
    pub fn new(http: HttpClient, base_url: Url, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Alpha Vantage intraday resolutions; anything else falls back to 5min.
    pub fn map_interval(interval: &str) -> &'static str {
        match interval.to_lowercase().as_str() {
            "1min" => "1min",
            "5min" => "5min",
            "15min" => "15min",
            "30min" => "30min",
            "60min" | "1hour" => "60min",
            _ => "5min",
        }
    }

    /// `EURUSD` -> (`EUR`, `USD`).
    pub fn split_pair(symbol: &str) -> Result<(String, String), ProviderError> {
        let compact = compact_symbol(symbol);
        if compact.len() != 6 || !compact.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ProviderError::InvalidSymbol(symbol.to_string()));
        }
        Ok((compact[..3].to_string(), compact[3..].to_string()))
    }

    pub fn build_payload(
        symbol: &str,
        interval: &str,
        response: IntradayResponse,
    ) -> Result<SourcePayload, ProviderError> {
        let response = response.for_interval(Self::map_interval(interval));
        response.check_errors()?;

        let mut points = response.to_normalized()?;
        let signals = intraday_signals(&points);
        points.truncate(MAX_DATA_POINTS);

        Ok(SourcePayload::PriceSeries(PriceSeriesPayload {
            source: Provider::AlphaVantage.source_name().to_string(),
            symbol: symbol.to_uppercase(),
            formatted_symbol: None,
            interval: interval.to_string(),
            metadata: response.metadata(),
            data_points: points,
            signals,
            timestamp: Utc::now(),
        }))
    }

    async fn intraday(&self, symbol: &str, interval: &str) -> Result<SourcePayload, ProviderError> {
        let (from_symbol, to_symbol) = Self::split_pair(symbol)?;
        let av_interval = Self::map_interval(interval);

        let query = [
            ("function", "FX_INTRADAY".to_string()),
            ("from_symbol", from_symbol),
            ("to_symbol", to_symbol),
            ("interval", av_interval.to_string()),
            ("outputsize", "compact".to_string()),
            ("apikey", self.api_key.clone()),
        ];

        let response: IntradayResponse = self.http.get_json(&self.base_url, &query).await?;
        debug!("Alpha Vantage intraday response received for {}", symbol);

        Self::build_payload(symbol, interval, response)
    }

    pub fn build_rate_signal(
        symbol: &str,
        response: ExchangeRateResponse,
    ) -> Result<ExchangeRateSignal, ProviderError> {
        response.check_errors()?;
        let rate = response.to_normalized()?;

        Ok(ExchangeRateSignal {
            source: Provider::AlphaVantage.source_name().to_string(),
            symbol: compact_symbol(symbol),
            from_currency: rate.from_currency,
            to_currency: rate.to_currency,
            exchange_rate: rate.exchange_rate,
            last_refreshed: rate.last_refreshed,
            timezone: rate.timezone,
            recommendation: "NEUTRAL".to_string(),
            confidence: "LOW".to_string(),
            note: RATE_NOTE.to_string(),
        })
    }

    pub async fn realtime_rate(&self, symbol: &str) -> Result<ExchangeRateSignal, ProviderError> {
        let (from_currency, to_currency) = Self::split_pair(symbol)?;
        let query = [
            ("function", "CURRENCY_EXCHANGE_RATE".to_string()),
            ("from_currency", from_currency),
            ("to_currency", to_currency),
            ("apikey", self.api_key.clone()),
        ];

        let response: ExchangeRateResponse = self.http.get_json(&self.base_url, &query).await?;
        debug!("Alpha Vantage exchange rate received for {}", symbol);

        Self::build_rate_signal(symbol, response)
    }
}

#[async_trait]
impl SignalSource for AlphaVantageService {
    fn provider(&self) -> Provider {
        Provider::AlphaVantage
    }

    async fn fetch(&self, symbol: &str, interval: &str) -> SourceResult {
        match self.intraday(symbol, interval).await {
            Ok(payload) => payload.into(),
            Err(e) => {
                error!("Error fetching Alpha Vantage intraday data for {}: {}", symbol, e);
                SourceResult::error(self.provider(), symbol, e.to_string())
            }
        }
    }
}
