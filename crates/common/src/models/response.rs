use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::consensus::ConsensusResult;
use crate::models::provider::Provider;
use crate::models::source::SourceResult;

/// Envelope returned for one aggregation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResponse {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub interval: String,
    pub sources: BTreeMap<Provider, SourceResult>,
    pub consensus: ConsensusResult,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::models::consensus::AgreementLevel;
    use crate::models::payload::{
        IndicatorSnapshot, SourcePayload, TechnicalSummary, TechnicalSummaryPayload, TickSignal,
        TickSignalBatch, TickSignalsPayload,
    };
    use crate::models::signal::{ConfidenceLevel, Recommendation};

    fn sample_response() -> AggregatedResponse {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let mut sources = BTreeMap::new();
        sources.insert(
            Provider::TradingView,
            SourceResult::Payload(SourcePayload::TechnicalSummary(TechnicalSummaryPayload {
                source: "TradingView TA".to_string(),
                symbol: "EURUSD".to_string(),
                tradingview_symbol: "FX:EURUSD".to_string(),
                interval: "15min".to_string(),
                timestamp: ts,
                summary: TechnicalSummary {
                    recommendation: Some("BUY".to_string()),
                    buy_signals: 8,
                    sell_signals: 2,
                    neutral_signals: 4,
                },
                indicators: IndicatorSnapshot {
                    rsi: Some(61.25),
                    close: Some(1.08503),
                    ..Default::default()
                },
            })),
        );
        sources.insert(
            Provider::AlphaVantage,
            SourceResult::error(Provider::AlphaVantage, "eurusd", "API rate limit exceeded"),
        );
        sources.insert(
            Provider::TrueFx,
            SourceResult::Payload(SourcePayload::TickSignals(TickSignalsPayload {
                source: "TrueFX".to_string(),
                symbol: "EURUSD".to_string(),
                formatted_symbol: "EUR/USD".to_string(),
                date,
                signals: TickSignalBatch {
                    date,
                    symbol: "EUR/USD".to_string(),
                    total_signals: 1,
                    signals: vec![TickSignal {
                        time: "00:00".to_string(),
                        session: "Asian session start".to_string(),
                        recommendation: Some("NEUTRAL".to_string()),
                        confidence: Some("MEDIUM".to_string()),
                        note: None,
                    }],
                    note: None,
                },
                note: None,
                timestamp: ts,
            })),
        );

        AggregatedResponse {
            symbol: "EURUSD".to_string(),
            timestamp: ts,
            interval: "15min".to_string(),
            sources,
            consensus: ConsensusResult {
                overall_recommendation: Recommendation::Neutral,
                buy_votes: 1,
                sell_votes: 0,
                neutral_votes: 1,
                total_sources: 2,
                average_confidence: ConfidenceLevel::High,
                agreement_level: AgreementLevel::ModerateAgreement,
            },
            summary: "Consensus Recommendation: NEUTRAL".to_string(),
        }
    }

    #[test]
    fn json_round_trip_preserves_everything() {
        let response = sample_response();
        let json = serde_json::to_string(&response).unwrap();
        let back: AggregatedResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(back, response);
    }

    #[test]
    fn unrounded_floats_survive_a_round_trip() {
        let mut response = sample_response();
        if let Some(SourceResult::Payload(SourcePayload::TechnicalSummary(payload))) =
            response.sources.get_mut(&Provider::TradingView)
        {
            payload.indicators.macd_histogram = Some(0.1 + 0.2);
            payload.indicators.macd = Some(1.0 / 3.0);
        }

        let json = serde_json::to_string(&response).unwrap();
        let back: AggregatedResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(back, response);
    }

    #[test]
    fn json_shape_uses_wire_names() {
        let value = serde_json::to_value(sample_response()).unwrap();

        assert_eq!(value["consensus"]["agreement_level"], "MODERATE_AGREEMENT");
        assert_eq!(value["consensus"]["overall_recommendation"], "NEUTRAL");
        assert_eq!(value["consensus"]["average_confidence"], "HIGH");
        assert_eq!(value["sources"]["alphavantage"]["error"], "API rate limit exceeded");
        assert_eq!(value["sources"]["tradingview"]["summary"]["buy_signals"], 8);
        assert_eq!(value["sources"]["truefx"]["signals"]["signals"][0]["time"], "00:00");
        assert!(value["sources"].get("twelvedata").is_none());
    }
}
