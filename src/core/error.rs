//! Error types for provider fetches and the exchange surface.
//!
//! Provider errors are caught and logged at the resolver boundary and
//! collapsed into the fallback chain; they never reach callers of
//! `get_rate` or `convert`. [`ExchangeError`] is the caller-visible
//! taxonomy.

use crate::core::rate::ProviderId;
use thiserror::Error;

/// Failures a provider adapter must distinguish for diagnostics.
///
/// All variants collapse to "fetch failed" for the resolver; the
/// distinction exists so logs can tell a dead endpoint from a delisted
/// pair.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request exceeded the per-call timeout.
    #[error("request to {provider} timed out")]
    Timeout { provider: ProviderId },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP error {status} from {provider}")]
    Http {
        provider: ProviderId,
        status: reqwest::StatusCode,
    },

    /// The response body did not match the expected shape.
    #[error("malformed response from {provider}: {message}")]
    MalformedResponse {
        provider: ProviderId,
        message: String,
    },

    /// The trading pair is not listed, even under known alias keys.
    #[error("pair {pair} not found on {provider}")]
    PairNotFound { provider: ProviderId, pair: String },

    /// Connection-level failure talking to the provider.
    #[error("network error from {provider}")]
    Network {
        provider: ProviderId,
        #[source]
        source: reqwest::Error,
    },
}

impl ProviderError {
    /// Classify a reqwest error, separating timeouts from other
    /// transport failures.
    pub fn from_reqwest(provider: ProviderId, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout { provider }
        } else {
            ProviderError::Network {
                provider,
                source: err,
            }
        }
    }
}

/// Errors visible to callers of the exchange surface.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Exchange execution is deliberately inert.
    #[error(
        "exchange execution is not implemented: this service prices conversions only; \
         settle via the native-asset transfer flow instead"
    )]
    NotImplemented,

    /// No usable rate at all, not even the static fallback. Only
    /// reachable with broken configuration; surfaced, never swallowed.
    #[error("no conversion rate available: {0}")]
    RateUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::PairNotFound {
            provider: ProviderId::Kraken,
            pair: "ZECXBT".to_string(),
        };
        assert_eq!(format!("{err}"), "pair ZECXBT not found on kraken");

        let err = ProviderError::MalformedResponse {
            provider: ProviderId::CoinGecko,
            message: "missing zcash price".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "malformed response from coingecko: missing zcash price"
        );
    }

    #[test]
    fn test_not_implemented_mentions_native_transfer() {
        let msg = ExchangeError::NotImplemented.to_string();
        assert!(msg.contains("not implemented"));
        assert!(msg.contains("native-asset transfer"));
    }
}
