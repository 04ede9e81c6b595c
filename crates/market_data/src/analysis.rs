//! Signal generation from price series. Both series providers share the
//! momentum and moving-average building blocks but weigh them differently.

use common::models::{PricePoint, SeriesSignals};
use ta::Next;
use ta::indicators::SimpleMovingAverage;

/// Percent move that counts as momentum.
pub const MOMENTUM_THRESHOLD_PCT: f64 = 0.1;
/// Quote-based percent move threshold (Twelve Data `/quote`).
pub const QUOTE_THRESHOLD_PCT: f64 = 0.05;

const PERCENT_DECIMALS: i32 = 4;
const PRICE_DECIMALS: i32 = 6;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Simple moving average of the `period` most recent closes.
/// `points` is newest first; `None` when the series is too short.
pub fn sma(points: &[PricePoint], period: usize) -> Option<f64> {
    if period == 0 || points.len() < period {
        return None;
    }
    let mut indicator = SimpleMovingAverage::new(period).ok()?;
    points[..period]
        .iter()
        .rev()
        .map(|p| indicator.next(p.close))
        .last()
}

struct Momentum {
    change: f64,
    percent: f64,
    latest: f64,
    previous: f64,
}

fn momentum(points: &[PricePoint]) -> Option<Momentum> {
    let (latest, previous) = match points {
        [latest, previous, ..] => (latest.close, previous.close),
        _ => return None,
    };
    let change = latest - previous;
    let percent = if previous > 0.0 {
        change / previous * 100.0
    } else {
        0.0
    };

    Some(Momentum {
        change,
        percent,
        latest,
        previous,
    })
}

fn insufficient() -> SeriesSignals {
    SeriesSignals {
        recommendation: Some("NEUTRAL".to_string()),
        reason: Some("Insufficient data points".to_string()),
        ..Default::default()
    }
}

/// Alpha Vantage intraday rules: momentum first, then the close against
/// SMA20 overrides it whenever twenty candles are available.
pub fn intraday_signals(points: &[PricePoint]) -> SeriesSignals {
    let Some(m) = momentum(points) else {
        return insufficient();
    };

    let (mut recommendation, mut confidence) = if m.percent > MOMENTUM_THRESHOLD_PCT {
        ("BUY", "MEDIUM")
    } else if m.percent < -MOMENTUM_THRESHOLD_PCT {
        ("SELL", "MEDIUM")
    } else {
        ("NEUTRAL", "LOW")
    };

    if let Some(sma_20) = sma(points, 20) {
        if m.latest > sma_20 {
            (recommendation, confidence) = ("BUY", "HIGH");
        } else if m.latest < sma_20 {
            (recommendation, confidence) = ("SELL", "HIGH");
        }
    }

    SeriesSignals {
        recommendation: Some(recommendation.to_string()),
        confidence: Some(confidence.to_string()),
        price_change: Some(m.change),
        price_change_percent: Some(round_to(m.percent, PERCENT_DECIMALS)),
        current_price: Some(m.latest),
        previous_price: Some(m.previous),
        ..Default::default()
    }
}

/// Twelve Data rules: momentum, then an SMA20/SMA50 stack, then the position
/// of the close inside the 20-candle support/resistance range.
pub fn time_series_signals(points: &[PricePoint]) -> SeriesSignals {
    let Some(m) = momentum(points) else {
        return insufficient();
    };

    let sma_20 = sma(points, 20);
    let sma_50 = sma(points, 50);

    let mut recommendation = "NEUTRAL";
    let mut confidence = "LOW";
    let mut reasons = Vec::new();

    if m.percent > MOMENTUM_THRESHOLD_PCT {
        (recommendation, confidence) = ("BUY", "MEDIUM");
        reasons.push("Positive price momentum".to_string());
    } else if m.percent < -MOMENTUM_THRESHOLD_PCT {
        (recommendation, confidence) = ("SELL", "MEDIUM");
        reasons.push("Negative price momentum".to_string());
    }

    if let (Some(fast), Some(slow)) = (sma_20, sma_50) {
        if m.latest > fast && fast > slow {
            (recommendation, confidence) = ("BUY", "HIGH");
            reasons.push("Price above both moving averages (bullish)".to_string());
        } else if m.latest < fast && fast < slow {
            (recommendation, confidence) = ("SELL", "HIGH");
            reasons.push("Price below both moving averages (bearish)".to_string());
        }
    }

    let window = &points[..points.len().min(20)];
    let resistance = window.iter().map(|p| p.high).reduce(f64::max);
    let support = window.iter().map(|p| p.low).reduce(f64::min);

    if let (Some(res), Some(sup)) = (resistance, support) {
        if res != 0.0 && sup != 0.0 && m.latest > (res + sup) / 2.0 {
            if recommendation == "NEUTRAL" {
                (recommendation, confidence) = ("BUY", "MEDIUM");
            }
            reasons.push("Price above midpoint of support/resistance range".to_string());
        }
    }

    SeriesSignals {
        recommendation: Some(recommendation.to_string()),
        confidence: Some(confidence.to_string()),
        reason: None,
        price_change: Some(round_to(m.change, PRICE_DECIMALS)),
        price_change_percent: Some(round_to(m.percent, PERCENT_DECIMALS)),
        current_price: Some(m.latest),
        previous_price: Some(m.previous),
        sma_20: sma_20.map(|v| round_to(v, PRICE_DECIMALS)),
        sma_50: sma_50.map(|v| round_to(v, PRICE_DECIMALS)),
        support: support.map(|v| round_to(v, PRICE_DECIMALS)),
        resistance: resistance.map(|v| round_to(v, PRICE_DECIMALS)),
        reasons,
    }
}

/// Quote-based signal: a move beyond ±0.05 % is a MEDIUM call.
pub fn quote_signal(percent_change: f64) -> (&'static str, &'static str) {
    if percent_change > QUOTE_THRESHOLD_PCT {
        ("BUY", "MEDIUM")
    } else if percent_change < -QUOTE_THRESHOLD_PCT {
        ("SELL", "MEDIUM")
    } else {
        ("NEUTRAL", "LOW")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(close: f64) -> PricePoint {
        PricePoint {
            datetime: String::new(),
            open: close,
            high: close + 0.0005,
            low: close - 0.0005,
            close,
            volume: None,
        }
    }

    fn series(closes: &[f64]) -> Vec<PricePoint> {
        closes.iter().copied().map(candle).collect()
    }

    #[test]
    fn single_point_is_insufficient() {
        let signals = intraday_signals(&series(&[1.0850]));
        assert_eq!(signals.recommendation.as_deref(), Some("NEUTRAL"));
        assert_eq!(signals.confidence, None);
        assert_eq!(signals.reason.as_deref(), Some("Insufficient data points"));
    }

    #[test]
    fn intraday_momentum_drives_short_series() {
        // +0.2 %
        let up = intraday_signals(&series(&[1.0020, 1.0000]));
        assert_eq!(up.recommendation.as_deref(), Some("BUY"));
        assert_eq!(up.confidence.as_deref(), Some("MEDIUM"));
        assert_eq!(up.price_change_percent, Some(0.2));

        // -0.05 %, inside the band
        let flat = intraday_signals(&series(&[0.9995, 1.0000]));
        assert_eq!(flat.recommendation.as_deref(), Some("NEUTRAL"));
        assert_eq!(flat.confidence.as_deref(), Some("LOW"));
    }

    #[test]
    fn intraday_sma_overrides_momentum() {
        // Latest close sits below the 20-candle average despite a small uptick.
        let mut closes = vec![1.0000, 0.9999];
        closes.extend(std::iter::repeat_n(1.0100, 18));
        let signals = intraday_signals(&series(&closes));

        assert_eq!(signals.recommendation.as_deref(), Some("SELL"));
        assert_eq!(signals.confidence.as_deref(), Some("HIGH"));
    }

    #[test]
    fn sma_needs_enough_points() {
        assert_eq!(sma(&series(&[1.0, 2.0]), 3), None);
        let avg = sma(&series(&[3.0, 2.0, 1.0, 100.0]), 3).unwrap();
        assert!((avg - 2.0).abs() < 1e-12);
    }

    #[test]
    fn time_series_bullish_stack_is_high_confidence() {
        // Steadily rising market, newest first.
        let closes: Vec<f64> = (0..60).map(|i| 1.2000 - i as f64 * 0.0010).collect();
        let signals = time_series_signals(&series(&closes));

        assert_eq!(signals.recommendation.as_deref(), Some("BUY"));
        assert_eq!(signals.confidence.as_deref(), Some("HIGH"));
        assert!(signals.sma_20.unwrap() > signals.sma_50.unwrap());
        assert!(
            signals
                .reasons
                .iter()
                .any(|r| r == "Price above both moving averages (bullish)")
        );
    }

    #[test]
    fn time_series_range_midpoint_breaks_neutral() {
        // Flat momentum, but the close sits in the upper half of the range.
        let points = series(&[1.0010, 1.0010, 0.9990, 0.9980]);
        let signals = time_series_signals(&points);

        assert_eq!(signals.recommendation.as_deref(), Some("BUY"));
        assert_eq!(signals.confidence.as_deref(), Some("MEDIUM"));
        assert_eq!(signals.sma_20, None);
        assert_eq!(
            signals.reasons,
            vec!["Price above midpoint of support/resistance range".to_string()]
        );
    }

    #[test]
    fn quote_threshold_is_tighter() {
        assert_eq!(quote_signal(0.06), ("BUY", "MEDIUM"));
        assert_eq!(quote_signal(-0.06), ("SELL", "MEDIUM"));
        assert_eq!(quote_signal(0.05), ("NEUTRAL", "LOW"));
    }

    #[test]
    fn rounding_matches_decimal_places() {
        assert_eq!(round_to(0.123456789, 4), 0.1235);
        assert_eq!(round_to(1.08501249, 6), 1.085012);
    }
}
