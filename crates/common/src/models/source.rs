use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::payload::SourcePayload;
use crate::models::provider::Provider;

/// Outcome of one provider call for one request. Adapters never return
/// `Err`; every failure is folded into the `Error` variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceResult {
    Error(SourceError),
    Payload(SourcePayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceError {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "error")]
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl SourceResult {
    pub fn error(provider: Provider, symbol: &str, message: impl Into<String>) -> Self {
        Self::Error(SourceError {
            source: provider.source_name().to_string(),
            symbol: Some(symbol.to_uppercase()),
            message: message.into(),
            timestamp: Utc::now(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn payload(&self) -> Option<&SourcePayload> {
        match self {
            Self::Payload(p) => Some(p),
            Self::Error(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(e) => Some(&e.message),
            Self::Payload(_) => None,
        }
    }
}

impl From<SourcePayload> for SourceResult {
    fn from(payload: SourcePayload) -> Self {
        Self::Payload(payload)
    }
}
