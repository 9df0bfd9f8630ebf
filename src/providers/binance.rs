use crate::core::{ProviderError, ProviderId, RateProvider};
use async_trait::async_trait;
use futures::future::try_join;
use serde::Deserialize;
use tracing::{debug, error, instrument};

const BTC_SYMBOL: &str = "BTCUSDT";
const ZEC_SYMBOL: &str = "ZECUSDT";

/// Binance returns this code for symbols it does not list.
const INVALID_SYMBOL_CODE: i64 = -1121;

/// Two independent ticker lookups against the USDT quote currency; the
/// rate is derived as price(BTC) / price(ZEC).
pub struct BinanceProvider {
    base_url: String,
}

impl BinanceProvider {
    pub fn new(base_url: &str) -> Self {
        BinanceProvider {
            base_url: base_url.to_string(),
        }
    }

    fn malformed(&self, message: impl Into<String>) -> ProviderError {
        ProviderError::MalformedResponse {
            provider: self.id(),
            message: message.into(),
        }
    }

    async fn fetch_price(&self, client: &reqwest::Client, symbol: &str) -> Result<f64, ProviderError> {
        let url = format!("{}/api/v3/ticker/price?symbol={}", self.base_url, symbol);
        debug!("Requesting ticker from {}", url);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(self.id(), e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(self.id(), e))?;

        if !status.is_success() {
            if let Ok(api_err) = serde_json::from_str::<BinanceApiError>(&text)
                && api_err.code == INVALID_SYMBOL_CODE
            {
                return Err(ProviderError::PairNotFound {
                    provider: self.id(),
                    pair: symbol.to_string(),
                });
            }
            return Err(ProviderError::Http {
                provider: self.id(),
                status,
            });
        }

        let ticker: TickerPrice = serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, response = %text, "Failed to parse Binance ticker");
            self.malformed(format!("{e} for symbol {symbol}"))
        })?;

        ticker
            .price
            .trim()
            .parse()
            .map_err(|_| self.malformed(format!("unparseable price '{}' for {symbol}", ticker.price)))
    }
}

#[derive(Deserialize, Debug)]
struct TickerPrice {
    price: String,
}

#[derive(Deserialize, Debug)]
struct BinanceApiError {
    code: i64,
}

#[async_trait]
impl RateProvider for BinanceProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Binance
    }

    #[instrument(name = "BinanceRateFetch", skip(self))]
    async fn fetch_rate(&self) -> Result<f64, ProviderError> {
        let client = super::http_client(self.id())?;

        let (btc, zec) = try_join(
            self.fetch_price(&client, BTC_SYMBOL),
            self.fetch_price(&client, ZEC_SYMBOL),
        )
        .await?;

        if btc <= 0.0 {
            return Err(self.malformed(format!("non-positive {BTC_SYMBOL} price: {btc}")));
        }
        if zec <= 0.0 {
            return Err(self.malformed(format!("non-positive {ZEC_SYMBOL} price: {zec}")));
        }

        debug!(btc, zec, "Fetched Binance prices");
        Ok(btc / zec)
    }
}
