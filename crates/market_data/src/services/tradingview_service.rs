use async_trait::async_trait;
use chrono::Utc;
use common::models::{Provider, SourcePayload, SourceResult, TechnicalSummaryPayload};
use common::sources::SignalSource;
use tracing::{debug, error};
use url::Url;

use crate::error::ProviderError;
use crate::remote::{HttpClient, ScanRequest, ScanResponse, compact_symbol};
use crate::traits::RemoteResponse;

pub struct TradingViewService {
    http: HttpClient,
    scan_url: Url,
}

impl TradingViewService {
    pub fn new(http: HttpClient, scan_url: Url) -> Self {
        Self { http, scan_url }
    }

    /// Scanner column suffix for an interval. Daily columns carry no suffix.
    pub fn resolution(interval: &str) -> &'static str {
        match interval.to_lowercase().as_str() {
            "1min" => "1",
            "5min" => "5",
            "15min" => "15",
            "30min" => "30",
            "1hour" => "60",
            "4hour" => "240",
            "1day" => "",
            _ => "15",
        }
    }

    pub fn ticker(symbol: &str) -> String {
        format!("FX:{}", compact_symbol(symbol))
    }

    pub fn build_payload(
        symbol: &str,
        interval: &str,
        response: ScanResponse,
    ) -> Result<SourcePayload, ProviderError> {
        let row = response.data.first().ok_or(ProviderError::UnexpectedFormat)?;
        let (summary, indicators) = row.to_normalized()?;

        Ok(SourcePayload::TechnicalSummary(TechnicalSummaryPayload {
            source: Provider::TradingView.source_name().to_string(),
            symbol: symbol.to_uppercase(),
            tradingview_symbol: row.ticker.clone(),
            interval: interval.to_string(),
            timestamp: Utc::now(),
            summary,
            indicators,
        }))
    }

    async fn analysis(&self, symbol: &str, interval: &str) -> Result<SourcePayload, ProviderError> {
        let request = ScanRequest::new(&Self::ticker(symbol), Self::resolution(interval));
        let response: ScanResponse = self.http.post_json(&self.scan_url, &request).await?;
        debug!("TradingView scan returned {} rows for {}", response.data.len(), symbol);

        Self::build_payload(symbol, interval, response)
    }
}

#[async_trait]
impl SignalSource for TradingViewService {
    fn provider(&self) -> Provider {
        Provider::TradingView
    }

    async fn fetch(&self, symbol: &str, interval: &str) -> SourceResult {
        match self.analysis(symbol, interval).await {
            Ok(payload) => payload.into(),
            Err(e) => {
                error!("Error fetching TradingView analysis for {}: {}", symbol, e);
                SourceResult::error(self.provider(), symbol, e.to_string())
            }
        }
    }
}
