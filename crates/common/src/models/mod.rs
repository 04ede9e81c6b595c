pub mod consensus;
pub mod payload;
pub mod provider;
pub mod response;
pub mod signal;
pub mod source;

pub use consensus::{AgreementLevel, ConsensusResult};
pub use payload::{
    IndicatorSnapshot, PricePoint, PriceSeriesPayload, SeriesSignals, SourcePayload,
    TechnicalSummary, TechnicalSummaryPayload, TickSignal, TickSignalBatch, TickSignalsPayload,
};
pub use provider::Provider;
pub use response::AggregatedResponse;
pub use signal::{ConfidenceLevel, NormalizedSignal, Recommendation};
pub use source::{SourceError, SourceResult};
