use std::fmt;

use serde::{Deserialize, Serialize};

/// External forex data services. Declaration order is the fixed iteration
/// order for anything that reaches the output (summary text, source maps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    TradingView,
    AlphaVantage,
    TwelveData,
    TrueFx,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::TradingView,
        Provider::AlphaVantage,
        Provider::TwelveData,
        Provider::TrueFx,
    ];

    /// Key used in the `sources` map.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TradingView => "tradingview",
            Self::AlphaVantage => "alphavantage",
            Self::TwelveData => "twelvedata",
            Self::TrueFx => "truefx",
        }
    }

    /// Vendor name carried in each source's `source` field.
    pub fn source_name(&self) -> &'static str {
        match self {
            Self::TradingView => "TradingView TA",
            Self::AlphaVantage => "Alpha Vantage",
            Self::TwelveData => "Twelve Data",
            Self::TrueFx => "TrueFX",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
