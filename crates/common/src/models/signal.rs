use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Neutral,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecommendation(pub String);

impl fmt::Display for UnknownRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized recommendation: {}", self.0)
    }
}

impl std::error::Error for UnknownRecommendation {}

/// Case-insensitive. Anything outside BUY / SELL / NEUTRAL (e.g. `STRONG_BUY`) is rejected.
impl FromStr for Recommendation {
    type Err = UnknownRecommendation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            "NEUTRAL" => Ok(Self::Neutral),
            _ => Err(UnknownRecommendation(s.to_string())),
        }
    }
}

/// Ordered LOW < MEDIUM < HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Integer weight used when averaging confidence across sources.
    pub const fn weight(self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Unknown strings weigh the same as LOW.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Self::High,
            "MEDIUM" => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSignal {
    pub recommendation: Recommendation,
    pub confidence: ConfidenceLevel,
}

impl NormalizedSignal {
    pub fn new(recommendation: Recommendation, confidence: ConfidenceLevel) -> Self {
        Self {
            recommendation,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_parsing_ignores_case() {
        assert_eq!("buy".parse::<Recommendation>(), Ok(Recommendation::Buy));
        assert_eq!(" Sell ".parse::<Recommendation>(), Ok(Recommendation::Sell));
        assert_eq!("NEUTRAL".parse::<Recommendation>(), Ok(Recommendation::Neutral));
    }

    #[test]
    fn strong_variants_are_rejected() {
        assert!("STRONG_BUY".parse::<Recommendation>().is_err());
        assert!("".parse::<Recommendation>().is_err());
    }

    #[test]
    fn confidence_is_ordered_and_weighted() {
        assert!(ConfidenceLevel::Low < ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium < ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::High.weight(), 3);
        assert_eq!(ConfidenceLevel::parse_lenient("medium"), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::parse_lenient("VERY_HIGH"), ConfidenceLevel::Low);
    }

    #[test]
    fn enums_serialize_uppercase() {
        let json = serde_json::to_string(&NormalizedSignal::new(
            Recommendation::Buy,
            ConfidenceLevel::High,
        ))
        .unwrap();
        assert_eq!(json, r#"{"recommendation":"BUY","confidence":"HIGH"}"#);
    }
}
