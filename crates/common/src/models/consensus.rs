use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::signal::{ConfidenceLevel, Recommendation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementLevel {
    NoData,
    SingleSource,
    StrongAgreement,
    ModerateAgreement,
    MixedSignals,
}

impl AgreementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoData => "NO_DATA",
            Self::SingleSource => "SINGLE_SOURCE",
            Self::StrongAgreement => "STRONG_AGREEMENT",
            Self::ModerateAgreement => "MODERATE_AGREEMENT",
            Self::MixedSignals => "MIXED_SIGNALS",
        }
    }
}

impl fmt::Display for AgreementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vote-based reduction of every usable signal of one request.
/// `buy_votes + sell_votes + neutral_votes == total_sources` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub overall_recommendation: Recommendation,
    pub buy_votes: usize,
    pub sell_votes: usize,
    pub neutral_votes: usize,
    pub total_sources: usize,
    pub average_confidence: ConfidenceLevel,
    pub agreement_level: AgreementLevel,
}

impl ConsensusResult {
    pub fn no_data() -> Self {
        Self {
            overall_recommendation: Recommendation::Neutral,
            buy_votes: 0,
            sell_votes: 0,
            neutral_votes: 0,
            total_sources: 0,
            average_confidence: ConfidenceLevel::Low,
            agreement_level: AgreementLevel::NoData,
        }
    }
}
