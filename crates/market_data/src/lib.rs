pub mod analysis;
pub mod error;
pub mod remote;
pub mod services;
pub mod traits;

pub use error::ProviderError;
pub use services::default_sources;
