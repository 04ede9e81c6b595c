use async_trait::async_trait;
use chrono::Utc;
use common::models::{PriceSeriesPayload, Provider, SourcePayload, SourceResult};
use common::sources::SignalSource;
use serde::Serialize;
use tracing::{debug, error};
use url::Url;

use crate::analysis::{quote_signal, round_to, time_series_signals};
use crate::error::ProviderError;
use crate::remote::{HttpClient, QuoteResponse, TimeSeriesResponse, slash_symbol};
use crate::traits::RemoteResponse;

pub const DEFAULT_OUTPUT_SIZE: u32 = 100;
const MAX_OUTPUT_SIZE: u32 = 5000;

/// Real-time quote with its momentum call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSignal {
    pub source: String,
    pub symbol: String,
    pub formatted_symbol: String,
    pub recommendation: String,
    pub confidence: String,
    pub price_change_percent: f64,
    pub current_price: f64,
    pub previous_close: f64,
    pub quoted_at: String,
}

pub struct TwelveDataService {
    http: HttpClient,
    base_url: Url,
    api_key: String,
    output_size: u32,
}

impl TwelveDataService {
    pub fn new(http: HttpClient, base_url: Url, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
            output_size: DEFAULT_OUTPUT_SIZE,
        }
    }

    pub fn with_output_size(mut self, output_size: u32) -> Self {
        self.output_size = output_size.clamp(1, MAX_OUTPUT_SIZE);
        self
    }

    /// Twelve Data interval names.
    pub fn map_interval(interval: &str) -> &'static str {
        match interval.to_lowercase().as_str() {
            "1min" => "1min",
            "5min" => "5min",
            "15min" => "15min",
            "30min" => "30min",
            "1hour" | "1h" => "1h",
            "4hour" | "4h" => "4h",
            "1day" => "1day",
            _ => "15min",
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::Api(format!("Invalid endpoint {}: {}", path, e)))
    }

    pub fn build_payload(
        symbol: &str,
        interval: &str,
        response: TimeSeriesResponse,
    ) -> Result<SourcePayload, ProviderError> {
        response.check_errors()?;

        let points = response.to_normalized()?;
        let signals = time_series_signals(&points);

        Ok(SourcePayload::PriceSeries(PriceSeriesPayload {
            source: Provider::TwelveData.source_name().to_string(),
            symbol: symbol.to_uppercase(),
            formatted_symbol: Some(slash_symbol(symbol)),
            interval: interval.to_string(),
            metadata: response.metadata(),
            data_points: points,
            signals,
            timestamp: Utc::now(),
        }))
    }

    async fn time_series(&self, symbol: &str, interval: &str) -> Result<SourcePayload, ProviderError> {
        let url = self.endpoint("time_series")?;
        let query = [
            ("symbol", slash_symbol(symbol)),
            ("interval", Self::map_interval(interval).to_string()),
            ("outputsize", self.output_size.to_string()),
            ("format", "JSON".to_string()),
            ("apikey", self.api_key.clone()),
        ];

        let response: TimeSeriesResponse = self.http.get_json(&url, &query).await?;
        debug!("Twelve Data time series received for {}", symbol);

        Self::build_payload(symbol, interval, response)
    }

    pub fn build_quote_signal(
        symbol: &str,
        response: QuoteResponse,
    ) -> Result<QuoteSignal, ProviderError> {
        response.check_errors()?;
        let quote = response.to_normalized()?;
        let (recommendation, confidence) = quote_signal(quote.percent_change);

        Ok(QuoteSignal {
            source: Provider::TwelveData.source_name().to_string(),
            symbol: symbol.to_uppercase(),
            formatted_symbol: quote.symbol,
            recommendation: recommendation.to_string(),
            confidence: confidence.to_string(),
            price_change_percent: round_to(quote.percent_change, 4),
            current_price: quote.close,
            previous_close: quote.previous_close,
            quoted_at: quote.datetime,
        })
    }

    pub async fn realtime_quote(&self, symbol: &str) -> Result<QuoteSignal, ProviderError> {
        let url = self.endpoint("quote")?;
        let query = [
            ("symbol", slash_symbol(symbol)),
            ("apikey", self.api_key.clone()),
        ];

        let response: QuoteResponse = self.http.get_json(&url, &query).await?;
        Self::build_quote_signal(symbol, response)
    }
}

#[async_trait]
impl SignalSource for TwelveDataService {
    fn provider(&self) -> Provider {
        Provider::TwelveData
    }

    async fn fetch(&self, symbol: &str, interval: &str) -> SourceResult {
        match self.time_series(symbol, interval).await {
            Ok(payload) => payload.into(),
            Err(e) => {
                error!("Error fetching Twelve Data time series for {}: {}", symbol, e);
                SourceResult::error(self.provider(), symbol, e.to_string())
            }
        }
    }
}
