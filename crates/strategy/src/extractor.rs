//! Normalizes each provider's native payload into a `NormalizedSignal`.
//!
//! Extraction is selected by provider identity. A payload whose shape does
//! not belong to its provider, an error result, a missing recommendation or
//! one outside BUY / SELL / NEUTRAL all mean the source abstains.

use common::models::{
    ConfidenceLevel, NormalizedSignal, PriceSeriesPayload, Provider, Recommendation,
    SourcePayload, SourceResult, TechnicalSummaryPayload, TickSignalsPayload,
};
use tracing::debug;

/// A side must outnumber the other by this factor for a HIGH technical summary.
pub const CONFIDENCE_DOMINANCE_FACTOR: f64 = 1.5;

pub trait SignalExtractor: Send + Sync {
    fn extract(&self, payload: &SourcePayload) -> Option<NormalizedSignal>;
}

/// Technical-indicator summaries. Confidence is derived from the buy/sell
/// sub-vote balance and is never LOW.
pub struct TechnicalSummaryExtractor;

/// Price-series providers carry their call in a nested `signals` object.
pub struct PriceSeriesExtractor;

/// Tick batches: the first session entry is the most recent one.
pub struct TickSeriesExtractor;

impl TechnicalSummaryExtractor {
    fn confidence(buy: u32, sell: u32) -> ConfidenceLevel {
        let (buy, sell) = (f64::from(buy), f64::from(sell));
        if buy > sell * CONFIDENCE_DOMINANCE_FACTOR || sell > buy * CONFIDENCE_DOMINANCE_FACTOR {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Medium
        }
    }

    fn from_payload(payload: &TechnicalSummaryPayload) -> Option<NormalizedSignal> {
        let summary = &payload.summary;
        let recommendation = parse_recommendation(summary.recommendation.as_deref()?)?;

        Some(NormalizedSignal::new(
            recommendation,
            Self::confidence(summary.buy_signals, summary.sell_signals),
        ))
    }
}

impl SignalExtractor for TechnicalSummaryExtractor {
    fn extract(&self, payload: &SourcePayload) -> Option<NormalizedSignal> {
        match payload {
            SourcePayload::TechnicalSummary(p) => Self::from_payload(p),
            _ => None,
        }
    }
}

impl PriceSeriesExtractor {
    fn from_payload(payload: &PriceSeriesPayload) -> Option<NormalizedSignal> {
        let signals = &payload.signals;
        let recommendation = parse_recommendation(signals.recommendation.as_deref()?)?;
        let confidence = signals
            .confidence
            .as_deref()
            .map(ConfidenceLevel::parse_lenient)
            .unwrap_or(ConfidenceLevel::Low);

        Some(NormalizedSignal::new(recommendation, confidence))
    }
}

impl SignalExtractor for PriceSeriesExtractor {
    fn extract(&self, payload: &SourcePayload) -> Option<NormalizedSignal> {
        match payload {
            SourcePayload::PriceSeries(p) => Self::from_payload(p),
            _ => None,
        }
    }
}

impl TickSeriesExtractor {
    fn from_payload(payload: &TickSignalsPayload) -> Option<NormalizedSignal> {
        let latest = payload.signals.signals.first()?;

        let recommendation =
            parse_recommendation(latest.recommendation.as_deref().unwrap_or("NEUTRAL"))?;
        let confidence = latest
            .confidence
            .as_deref()
            .map(ConfidenceLevel::parse_lenient)
            .unwrap_or(ConfidenceLevel::Low);

        Some(NormalizedSignal::new(recommendation, confidence))
    }
}

impl SignalExtractor for TickSeriesExtractor {
    fn extract(&self, payload: &SourcePayload) -> Option<NormalizedSignal> {
        match payload {
            SourcePayload::TickSignals(p) => Self::from_payload(p),
            _ => None,
        }
    }
}

fn parse_recommendation(raw: &str) -> Option<Recommendation> {
    match raw.parse::<Recommendation>() {
        Ok(rec) => Some(rec),
        Err(e) => {
            debug!("Skipping source signal: {}", e);
            None
        }
    }
}

pub fn extractor_for(provider: Provider) -> &'static dyn SignalExtractor {
    match provider {
        Provider::TradingView => &TechnicalSummaryExtractor,
        Provider::AlphaVantage | Provider::TwelveData => &PriceSeriesExtractor,
        Provider::TrueFx => &TickSeriesExtractor,
    }
}

/// `None` when the provider failed or abstains.
pub fn extract_signal(provider: Provider, result: &SourceResult) -> Option<NormalizedSignal> {
    let payload = result.payload()?;
    let signal = extractor_for(provider).extract(payload);
    if signal.is_none() {
        debug!("{} returned no usable signal", provider);
    }
    signal
}
