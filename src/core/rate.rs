//! Rate provider abstractions and core types

use crate::core::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Identifies one of the supported external price sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    CoinGecko,
    Binance,
    Kraken,
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ProviderId::CoinGecko => "coingecko",
                ProviderId::Binance => "binance",
                ProviderId::Kraken => "kraken",
            }
        )
    }
}

impl FromStr for ProviderId {
    type Err = std::convert::Infallible;

    /// Unknown selections resolve to the primary provider instead of
    /// failing startup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "coingecko" => ProviderId::CoinGecko,
            "binance" => ProviderId::Binance,
            "kraken" => ProviderId::Kraken,
            other => {
                tracing::warn!(
                    provider = other,
                    "Unknown provider selection, defaulting to coingecko"
                );
                ProviderId::CoinGecko
            }
        })
    }
}

/// Where a resolved rate came from, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RateSource {
    /// Fetched from the provider on this call.
    Live,
    /// Served from the TTL cache.
    Cached,
    /// Provider failed; the most recent successful fetch was reused.
    LastKnown,
    /// Provider failed with no prior success; static configured rate.
    Fallback,
}

impl Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RateSource::Live => "live",
                RateSource::Cached => "cached",
                RateSource::LastKnown => "last-known",
                RateSource::Fallback => "fallback",
            }
        )
    }
}

impl RateSource {
    /// True when the rate did not come from a fresh or cached provider
    /// quote. Operators use this to detect degraded pricing.
    pub fn is_degraded(&self) -> bool {
        matches!(self, RateSource::LastKnown | RateSource::Fallback)
    }
}

/// A resolved ZEC-per-BTC rate with its provenance.
#[derive(Debug, Clone, Copy)]
pub struct RateQuote {
    pub rate: f64,
    pub source: RateSource,
}

/// A single external price source able to quote ZEC per BTC.
///
/// Implementations must complete or fail within the request timeout and
/// never mutate resolver state; they only return a rate or an error.
#[async_trait]
pub trait RateProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetch the current ZEC-per-BTC rate from the external source.
    async fn fetch_rate(&self) -> Result<f64, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_roundtrip() {
        for (s, id) in [
            ("coingecko", ProviderId::CoinGecko),
            ("binance", ProviderId::Binance),
            ("kraken", ProviderId::Kraken),
        ] {
            assert_eq!(s.parse::<ProviderId>().unwrap(), id);
            assert_eq!(id.to_string(), s);
        }
    }

    #[test]
    fn test_unknown_provider_defaults_to_primary() {
        assert_eq!(
            "bitfinex".parse::<ProviderId>().unwrap(),
            ProviderId::CoinGecko
        );
        assert_eq!("".parse::<ProviderId>().unwrap(), ProviderId::CoinGecko);
    }

    #[test]
    fn test_provider_id_parse_is_case_insensitive() {
        assert_eq!(
            " Kraken ".parse::<ProviderId>().unwrap(),
            ProviderId::Kraken
        );
    }

    #[test]
    fn test_degraded_sources() {
        assert!(!RateSource::Live.is_degraded());
        assert!(!RateSource::Cached.is_degraded());
        assert!(RateSource::LastKnown.is_degraded());
        assert!(RateSource::Fallback.is_degraded());
    }
}
