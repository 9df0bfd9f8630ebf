use crate::core::{ProviderError, ProviderId, RateProvider};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, instrument};

/// Primary adapter. One request returns both USD prices; the rate is
/// derived as price(BTC) / price(ZEC).
pub struct CoinGeckoProvider {
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
        }
    }

    fn malformed(&self, message: impl Into<String>) -> ProviderError {
        ProviderError::MalformedResponse {
            provider: self.id(),
            message: message.into(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct SimplePriceResponse {
    bitcoin: Option<AssetPrice>,
    zcash: Option<AssetPrice>,
}

#[derive(Deserialize, Debug)]
struct AssetPrice {
    usd: Option<f64>,
}

#[async_trait]
impl RateProvider for CoinGeckoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::CoinGecko
    }

    #[instrument(name = "CoinGeckoRateFetch", skip(self))]
    async fn fetch_rate(&self) -> Result<f64, ProviderError> {
        let url = format!(
            "{}/api/v3/simple/price?ids=bitcoin,zcash&vs_currencies=usd",
            self.base_url
        );
        debug!("Requesting prices from {}", url);

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

        let data: SimplePriceResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, response = %text, "Failed to parse CoinGecko response");
            self.malformed(e.to_string())
        })?;

        let btc_usd = data
            .bitcoin
            .and_then(|a| a.usd)
            .ok_or_else(|| self.malformed("missing bitcoin usd price"))?;
        let zec_usd = data
            .zcash
            .and_then(|a| a.usd)
            .ok_or_else(|| self.malformed("missing zcash usd price"))?;

        if btc_usd <= 0.0 {
            return Err(self.malformed(format!("non-positive bitcoin price: {btc_usd}")));
        }
        if zec_usd <= 0.0 {
            return Err(self.malformed(format!("non-positive zcash price: {zec_usd}")));
        }

        debug!(btc_usd, zec_usd, "Fetched CoinGecko prices");
        Ok(btc_usd / zec_usd)
    }
}
