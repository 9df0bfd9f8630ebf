//! Core abstractions: the provider contract, rate cache and errors

pub mod cache;
pub mod error;
pub mod log;
pub mod rate;

// Re-export main types for cleaner imports
pub use cache::RateCache;
pub use error::{ExchangeError, ProviderError};
pub use rate::{ProviderId, RateProvider, RateQuote, RateSource};
