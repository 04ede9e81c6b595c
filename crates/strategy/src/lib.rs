pub mod consensus;
pub mod extractor;
pub mod services;
pub mod summary;

pub use consensus::calculate_consensus;
pub use extractor::extract_signal;
pub use services::aggregator_service::AggregatorService;
pub use summary::render_summary;
