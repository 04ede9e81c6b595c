use common::models::{IndicatorSnapshot, TechnicalSummary};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::traits::RemoteResponse;

/// Indicator columns requested from the scanner, in response order.
const BASE_COLUMNS: [&str; 20] = [
    "Recommend.All",
    "Recommend.MA",
    "Recommend.Other",
    "RSI",
    "MACD.macd",
    "MACD.signal",
    "close",
    "volume",
    "EMA10",
    "SMA10",
    "EMA20",
    "SMA20",
    "EMA30",
    "SMA30",
    "EMA50",
    "SMA50",
    "EMA100",
    "SMA100",
    "EMA200",
    "SMA200",
];

const REC_ALL: usize = 0;
const RSI: usize = 3;
const MACD: usize = 4;
const MACD_SIGNAL: usize = 5;
const CLOSE: usize = 6;
const VOLUME: usize = 7;
const MOVING_AVERAGES: std::ops::Range<usize> = 8..20;
const EMA20: usize = 10;
const SMA20: usize = 11;
const EMA50: usize = 14;
const SMA50: usize = 15;

#[derive(Serialize, Debug)]
pub struct ScanRequest {
    pub symbols: ScanSymbols,
    pub columns: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct ScanSymbols {
    pub tickers: Vec<String>,
    pub query: ScanQuery,
}

#[derive(Serialize, Debug, Default)]
pub struct ScanQuery {
    pub types: Vec<String>,
}

impl ScanRequest {
    /// `resolution` is the scanner suffix (`15`, `240`, ...); empty means daily.
    pub fn new(ticker: &str, resolution: &str) -> Self {
        let columns = BASE_COLUMNS
            .iter()
            .map(|c| {
                if resolution.is_empty() {
                    c.to_string()
                } else {
                    format!("{}|{}", c, resolution)
                }
            })
            .collect();

        Self {
            symbols: ScanSymbols {
                tickers: vec![ticker.to_string()],
                query: ScanQuery::default(),
            },
            columns,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ScanResponse {
    #[serde(default)]
    pub data: Vec<ScanRow>,
}

#[derive(Deserialize, Debug)]
pub struct ScanRow {
    #[serde(rename(deserialize = "s"))]
    pub ticker: String,
    #[serde(rename(deserialize = "d"))]
    pub values: Vec<Option<f64>>,
}

/// Label used when the scanner returns no `Recommend.All` score.
const UNSCORED_LABEL: &str = "NEUTRAL";

/// Maps the aggregate `Recommend.All` score onto TradingView's five labels.
/// The neutral band `[-0.1, 0.1]` is closed; the outer bands start strictly
/// beyond +/-0.5.
pub fn recommendation_label(score: f64) -> &'static str {
    if score > 0.5 {
        "STRONG_BUY"
    } else if score > 0.1 {
        "BUY"
    } else if score >= -0.1 {
        "NEUTRAL"
    } else if score >= -0.5 {
        "SELL"
    } else {
        "STRONG_SELL"
    }
}

#[derive(Default)]
struct Tally {
    buy: u32,
    sell: u32,
    neutral: u32,
}

impl Tally {
    fn vote(&mut self, ordering: Option<std::cmp::Ordering>) {
        match ordering {
            Some(std::cmp::Ordering::Greater) => self.buy += 1,
            Some(std::cmp::Ordering::Less) => self.sell += 1,
            Some(std::cmp::Ordering::Equal) => self.neutral += 1,
            None => {}
        }
    }
}

impl ScanRow {
    fn value(&self, idx: usize) -> Option<f64> {
        self.values.get(idx).copied().flatten()
    }
}

impl RemoteResponse<(TechnicalSummary, IndicatorSnapshot)> for ScanRow {
    fn to_normalized(&self) -> Result<(TechnicalSummary, IndicatorSnapshot), ProviderError> {
        if self.values.len() < BASE_COLUMNS.len() {
            return Err(ProviderError::UnexpectedFormat);
        }

        let close = self.value(CLOSE);
        let mut tally = Tally::default();

        // Moving averages vote BUY when price trades above them.
        for idx in MOVING_AVERAGES {
            let ordering = match (close, self.value(idx)) {
                (Some(c), Some(ma)) => c.partial_cmp(&ma),
                _ => None,
            };
            tally.vote(ordering);
        }

        // RSI: oversold below 30 is a BUY, overbought above 70 a SELL.
        if let Some(rsi) = self.value(RSI) {
            tally.vote(Some(if rsi < 30.0 {
                std::cmp::Ordering::Greater
            } else if rsi > 70.0 {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Equal
            }));
        }

        let macd = self.value(MACD);
        let macd_signal = self.value(MACD_SIGNAL);
        if let (Some(m), Some(s)) = (macd, macd_signal) {
            tally.vote(m.partial_cmp(&s));
        }

        let summary = TechnicalSummary {
            recommendation: Some(
                self.value(REC_ALL)
                    .map_or(UNSCORED_LABEL, recommendation_label)
                    .to_string(),
            ),
            buy_signals: tally.buy,
            sell_signals: tally.sell,
            neutral_signals: tally.neutral,
        };

        let indicators = IndicatorSnapshot {
            rsi: self.value(RSI),
            macd,
            macd_signal,
            macd_histogram: macd.zip(macd_signal).map(|(m, s)| m - s),
            sma_20: self.value(SMA20),
            sma_50: self.value(SMA50),
            ema_20: self.value(EMA20),
            ema_50: self.value(EMA50),
            close,
            volume: self.value(VOLUME),
        };

        Ok((summary, indicators))
    }
}
