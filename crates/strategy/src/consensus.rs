use common::models::{
    AgreementLevel, ConfidenceLevel, ConsensusResult, NormalizedSignal, Recommendation,
};

/// Mean confidence weight at or above which the consensus is HIGH.
pub const HIGH_CONFIDENCE_MEAN: f64 = 2.5;
/// Mean confidence weight at or above which the consensus is MEDIUM.
pub const MEDIUM_CONFIDENCE_MEAN: f64 = 1.5;
pub const STRONG_AGREEMENT_RATIO: f64 = 0.75;
pub const MODERATE_AGREEMENT_RATIO: f64 = 0.5;

/// Reduces every usable signal of one request into a vote-based consensus.
/// Pure: the same signals always yield the same result.
pub fn calculate_consensus(signals: &[NormalizedSignal]) -> ConsensusResult {
    let total = signals.len();
    if total == 0 {
        return ConsensusResult::no_data();
    }

    let count = |rec: Recommendation| signals.iter().filter(|s| s.recommendation == rec).count();
    let buy_votes = count(Recommendation::Buy);
    let sell_votes = count(Recommendation::Sell);
    let neutral_votes = count(Recommendation::Neutral);

    // Only a strict winner counts; every tie falls back to NEUTRAL.
    let overall_recommendation = if buy_votes > sell_votes && buy_votes > neutral_votes {
        Recommendation::Buy
    } else if sell_votes > buy_votes && sell_votes > neutral_votes {
        Recommendation::Sell
    } else {
        Recommendation::Neutral
    };

    let weight_sum: u32 = signals.iter().map(|s| s.confidence.weight()).sum();
    let mean = f64::from(weight_sum) / total as f64;
    let average_confidence = if mean >= HIGH_CONFIDENCE_MEAN {
        ConfidenceLevel::High
    } else if mean >= MEDIUM_CONFIDENCE_MEAN {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    };

    let agreement_level = if total == 1 {
        AgreementLevel::SingleSource
    } else {
        let max_votes = buy_votes.max(sell_votes).max(neutral_votes);
        let ratio = max_votes as f64 / total as f64;
        if ratio >= STRONG_AGREEMENT_RATIO {
            AgreementLevel::StrongAgreement
        } else if ratio >= MODERATE_AGREEMENT_RATIO {
            AgreementLevel::ModerateAgreement
        } else {
            AgreementLevel::MixedSignals
        }
    };

    ConsensusResult {
        overall_recommendation,
        buy_votes,
        sell_votes,
        neutral_votes,
        total_sources: total,
        average_confidence,
        agreement_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use common::models::ConfidenceLevel::{High, Low, Medium};
    use common::models::Recommendation::{Buy, Neutral, Sell};

    fn sig(rec: Recommendation, conf: ConfidenceLevel) -> NormalizedSignal {
        NormalizedSignal::new(rec, conf)
    }

    #[test]
    fn no_signals_is_no_data() {
        let result = calculate_consensus(&[]);

        assert_eq!(result.overall_recommendation, Neutral);
        assert_eq!(result.agreement_level, AgreementLevel::NoData);
        assert_eq!(result.average_confidence, Low);
        assert_eq!(result.total_sources, 0);
    }

    #[test]
    fn single_signal_wins_alone() {
        let result = calculate_consensus(&[sig(Sell, Medium)]);

        assert_eq!(result.overall_recommendation, Sell);
        assert_eq!(result.agreement_level, AgreementLevel::SingleSource);
        assert_eq!(result.average_confidence, Medium);
        assert_eq!(result.sell_votes, 1);
    }

    #[test]
    fn three_way_tie_is_neutral() {
        let result = calculate_consensus(&[sig(Buy, High), sig(Sell, High), sig(Neutral, High)]);

        assert_eq!(result.overall_recommendation, Neutral);
        assert_eq!(result.agreement_level, AgreementLevel::MixedSignals);
    }

    #[test]
    fn two_way_tie_above_the_third_is_neutral() {
        let result = calculate_consensus(&[
            sig(Buy, High),
            sig(Buy, High),
            sig(Sell, High),
            sig(Sell, High),
        ]);

        assert_eq!(result.overall_recommendation, Neutral);
        assert_eq!(result.neutral_votes, 0);
        assert_eq!(result.agreement_level, AgreementLevel::ModerateAgreement);
    }

    #[test]
    fn plurality_with_mixed_confidence() {
        let result = calculate_consensus(&[
            sig(Buy, High),
            sig(Buy, High),
            sig(Sell, Low),
            sig(Neutral, Medium),
        ]);

        assert_eq!(
            result,
            ConsensusResult {
                overall_recommendation: Buy,
                buy_votes: 2,
                sell_votes: 1,
                neutral_votes: 1,
                total_sources: 4,
                average_confidence: Medium,
                agreement_level: AgreementLevel::ModerateAgreement,
            }
        );
    }

    #[test]
    fn unanimous_buy_is_strong() {
        let result = calculate_consensus(&[sig(Buy, High), sig(Buy, High), sig(Buy, Medium)]);

        assert_eq!(result.overall_recommendation, Buy);
        assert_eq!(result.agreement_level, AgreementLevel::StrongAgreement);
        assert_eq!(result.average_confidence, High);
    }

    #[test]
    fn confidence_thresholds_are_inclusive() {
        // mean 1.5
        let result = calculate_consensus(&[sig(Buy, Low), sig(Buy, Medium)]);
        assert_eq!(result.average_confidence, Medium);

        // mean 2.5
        let result = calculate_consensus(&[sig(Buy, Medium), sig(Buy, High)]);
        assert_eq!(result.average_confidence, High);

        // mean 1.333
        let result = calculate_consensus(&[sig(Buy, Low), sig(Buy, Low), sig(Buy, Medium)]);
        assert_eq!(result.average_confidence, Low);
    }

    #[test]
    fn three_of_four_is_strong_agreement() {
        let result = calculate_consensus(&[
            sig(Sell, Low),
            sig(Sell, Low),
            sig(Sell, Low),
            sig(Buy, Low),
        ]);

        assert_eq!(result.overall_recommendation, Sell);
        assert_eq!(result.agreement_level, AgreementLevel::StrongAgreement);
    }

    #[test]
    fn votes_always_sum_to_total() {
        let pool = [
            sig(Buy, High),
            sig(Sell, Low),
            sig(Neutral, Medium),
            sig(Buy, Low),
            sig(Sell, High),
        ];

        for len in 0..=pool.len() {
            for start in 0..pool.len() {
                let signals: Vec<_> = pool.iter().cycle().skip(start).take(len).copied().collect();
                let result = calculate_consensus(&signals);
                assert_eq!(
                    result.buy_votes + result.sell_votes + result.neutral_votes,
                    result.total_sources
                );
                assert_eq!(result.total_sources, len);
            }
        }
    }

    #[test]
    fn recalculation_is_identical() {
        let signals = [sig(Buy, High), sig(Neutral, Low), sig(Buy, Medium)];
        assert_eq!(calculate_consensus(&signals), calculate_consensus(&signals));
    }
}
