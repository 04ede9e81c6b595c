use std::collections::BTreeMap;

use common::models::{ConsensusResult, Provider, SourcePayload, SourceResult};

const SEPARATOR: &str = " | ";
const MISSING: &str = "N/A";

/// Label and raw recommendation for providers listed in the summary.
/// Tick batches have no single current call and are never listed.
fn source_fragment(provider: Provider, result: &SourceResult) -> Option<(&'static str, String)> {
    let payload = result.payload()?;

    match (provider, payload) {
        (Provider::TradingView, SourcePayload::TechnicalSummary(p)) => Some((
            "TradingView",
            p.summary.recommendation.clone().unwrap_or_else(|| MISSING.to_string()),
        )),
        (Provider::AlphaVantage, SourcePayload::PriceSeries(p)) => Some((
            "Alphavantage",
            p.signals.recommendation.clone().unwrap_or_else(|| MISSING.to_string()),
        )),
        (Provider::TwelveData, SourcePayload::PriceSeries(p)) => Some((
            "Twelvedata",
            p.signals.recommendation.clone().unwrap_or_else(|| MISSING.to_string()),
        )),
        _ => None,
    }
}

/// One-line description of a request: the consensus first, then one fragment
/// per listed provider in `Provider::ALL` order.
pub fn render_summary(
    sources: &BTreeMap<Provider, SourceResult>,
    consensus: &ConsensusResult,
) -> String {
    let mut parts = vec![
        format!("Consensus Recommendation: {}", consensus.overall_recommendation),
        format!("Agreement Level: {}", consensus.agreement_level),
        format!(
            "Votes - BUY: {}, SELL: {}, NEUTRAL: {}",
            consensus.buy_votes, consensus.sell_votes, consensus.neutral_votes
        ),
        format!("Average Confidence: {}", consensus.average_confidence),
    ];

    for provider in Provider::ALL {
        let Some(result) = sources.get(&provider) else {
            continue;
        };
        if let Some((label, recommendation)) = source_fragment(provider, result) {
            parts.push(format!("{}: {}", label, recommendation));
        }
    }

    parts.join(SEPARATOR)
}
