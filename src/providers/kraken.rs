use crate::core::{ProviderError, ProviderId, RateProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, instrument};

const PAIR: &str = "ZECXBT";

/// Kraken keys the ticker result under either the requested pair name
/// or its classic X-prefixed form, depending on listing convention.
/// Both must be tried before declaring the pair unavailable.
const PAIR_KEYS: [&str; 2] = ["ZECXBT", "XZECXXBT"];

/// Direct-pair adapter. The ZEC/XBT last trade price is BTC per ZEC,
/// so the quote is inverted to get ZEC per BTC.
pub struct KrakenProvider {
    base_url: String,
}

impl KrakenProvider {
    pub fn new(base_url: &str) -> Self {
        KrakenProvider {
            base_url: base_url.to_string(),
        }
    }

    fn malformed(&self, message: impl Into<String>) -> ProviderError {
        ProviderError::MalformedResponse {
            provider: self.id(),
            message: message.into(),
        }
    }

    fn pair_not_found(&self) -> ProviderError {
        ProviderError::PairNotFound {
            provider: self.id(),
            pair: PAIR.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct KrakenResponse {
    #[serde(default)]
    error: Vec<String>,
    #[serde(default)]
    result: HashMap<String, KrakenTicker>,
}

#[derive(Deserialize, Debug)]
struct KrakenTicker {
    /// Last trade closed: [price, lot volume]
    c: Vec<String>,
}

#[async_trait]
impl RateProvider for KrakenProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Kraken
    }

    #[instrument(name = "KrakenRateFetch", skip(self))]
    async fn fetch_rate(&self) -> Result<f64, ProviderError> {
        let url = format!("{}/0/public/Ticker?pair={}", self.base_url, PAIR);
        debug!("Requesting ticker from {}", url);

        let client = super::http_client(self.id())?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(self.id(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                provider: self.id(),
                status,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(self.id(), e))?;

        let data: KrakenResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, response = %text, "Failed to parse Kraken response");
            self.malformed(e.to_string())
        })?;

        if !data.error.is_empty() {
            if data.error.iter().any(|e| e.contains("Unknown asset pair")) {
                return Err(self.pair_not_found());
            }
            return Err(self.malformed(format!("kraken error: {}", data.error.join("; "))));
        }

        let ticker = PAIR_KEYS
            .iter()
            .find_map(|key| data.result.get(*key))
            .ok_or_else(|| self.pair_not_found())?;

        let last: f64 = ticker
            .c
            .first()
            .ok_or_else(|| self.malformed("missing last trade price"))?
            .parse()
            .map_err(|_| self.malformed(format!("unparseable last price: {:?}", ticker.c)))?;

        if last <= 0.0 {
            return Err(self.malformed(format!("non-positive last price: {last}")));
        }

        debug!(last, "Fetched Kraken ZEC/XBT last price");
        Ok(1.0 / last)
    }
}
