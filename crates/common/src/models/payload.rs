use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Provider-native payload shapes. Untagged: each shape is recognized by its
/// required fields (`summary` for technical summaries, `signals.signals` for
/// tick batches, `signals` for price series).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourcePayload {
    TechnicalSummary(TechnicalSummaryPayload),
    TickSignals(TickSignalsPayload),
    PriceSeries(PriceSeriesPayload),
}

// Technical-indicator aggregator

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSummaryPayload {
    pub source: String,
    pub symbol: String,
    pub tradingview_symbol: String,
    pub interval: String,
    pub timestamp: DateTime<Utc>,
    pub summary: TechnicalSummary,
    #[serde(default)]
    pub indicators: IndicatorSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub buy_signals: u32,
    #[serde(default)]
    pub sell_signals: u32,
    #[serde(default)]
    pub neutral_signals: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub ema_20: Option<f64>,
    pub ema_50: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

// Price-series providers

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeriesPayload {
    pub source: String,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_symbol: Option<String>,
    pub interval: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub data_points: Vec<PricePoint>,
    pub signals: SeriesSignals,
    pub timestamp: DateTime<Utc>,
}

/// One candle, newest first within a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub datetime: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSignals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_20: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

// Tick-data provider

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSignalsPayload {
    pub source: String,
    pub symbol: String,
    pub formatted_symbol: String,
    pub date: NaiveDate,
    pub signals: TickSignalBatch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSignalBatch {
    pub date: NaiveDate,
    pub symbol: String,
    pub total_signals: usize,
    /// Most recent entry first.
    pub signals: Vec<TickSignal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSignal {
    pub time: String,
    pub session: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
