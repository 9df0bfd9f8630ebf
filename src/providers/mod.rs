pub mod binance;
pub mod coingecko;
pub mod kraken;

pub use binance::BinanceProvider;
pub use coingecko::CoinGeckoProvider;
pub use kraken::KrakenProvider;

use crate::core::{ProviderError, ProviderId};
use std::time::Duration;

/// Hard timeout for every outbound provider call. Exceeding it is an
/// ordinary adapter failure, handled by the fallback chain.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

pub(crate) fn http_client(provider: ProviderId) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent("zenrate/1.0")
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ProviderError::from_reqwest(provider, e))
}
