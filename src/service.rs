//! The rate resolver and the advisory exchange surface built on it.
//!
//! Resolution pipeline: cache → configured provider → last-known-good →
//! static fallback. Provider failures are logged and absorbed here;
//! callers always get a rate as long as configuration validated at
//! startup.

use crate::config::DEFAULT_FALLBACK_RATE;
use crate::core::{ExchangeError, ProviderId, RateCache, RateProvider, RateQuote, RateSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Fixed advisory note attached to every conversion result.
pub const ADVISORY_NOTE: &str = "Advisory quote only. Settlement uses a separate \
    native-asset transfer; this service prices the conversion and moves no funds.";

const EXECUTION_MODE: &str = "advisory";

/// Runtime settings for the service, fixed at construction.
pub struct ServiceSettings {
    pub enabled: bool,
    pub cache_ttl: Duration,
    pub fallback_rate: f64,
}

/// A priced BTC→ZEC conversion. Computed per call, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub btc_amount: f64,
    pub zec_amount: f64,
    pub exchange_rate: f64,
    pub source: RateSource,
    pub timestamp: DateTime<Utc>,
    pub note: &'static str,
}

/// Read-only service snapshot. No side effects, no network access.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub enabled: bool,
    pub provider: ProviderId,
    pub mode: &'static str,
    pub cached_entries: usize,
}

/// Stub status for conversion tracking, which is out of scope.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionStatus {
    pub id: String,
    pub state: &'static str,
    pub detail: &'static str,
}

pub struct ExchangeService {
    provider: Box<dyn RateProvider>,
    cache: RateCache,
    last_known: Mutex<Option<f64>>,
    fallback_rate: f64,
    enabled: bool,
}

impl ExchangeService {
    pub fn new(provider: Box<dyn RateProvider>, settings: ServiceSettings) -> Self {
        // Startup invariant: the end of the fallback chain must be a
        // positive finite number, or get_rate loses totality.
        let fallback_rate = if settings.fallback_rate.is_finite() && settings.fallback_rate > 0.0 {
            settings.fallback_rate
        } else {
            warn!(
                rate = settings.fallback_rate,
                "Invalid fallback rate, using {}", DEFAULT_FALLBACK_RATE
            );
            DEFAULT_FALLBACK_RATE
        };

        Self {
            provider,
            cache: RateCache::new(settings.cache_ttl),
            last_known: Mutex::new(None),
            fallback_rate,
            enabled: settings.enabled,
        }
    }

    /// Resolve the current ZEC-per-BTC rate with its provenance.
    ///
    /// Never fails: a provider error falls through to last-known-good,
    /// then to the static fallback rate.
    pub async fn resolve_rate(&self) -> RateQuote {
        if let Some(rate) = self.cache.get().await {
            return RateQuote {
                rate,
                source: RateSource::Cached,
            };
        }

        match self.provider.fetch_rate().await {
            Ok(rate) => {
                self.cache.put(rate).await;
                *self.last_known.lock().await = Some(rate);
                info!(rate, provider = %self.provider.id(), "Fetched fresh rate");
                RateQuote {
                    rate,
                    source: RateSource::Live,
                }
            }
            Err(err) => {
                warn!(
                    error = %err,
                    provider = %self.provider.id(),
                    "Rate fetch failed, falling back"
                );
                match *self.last_known.lock().await {
                    Some(rate) => RateQuote {
                        rate,
                        source: RateSource::LastKnown,
                    },
                    None => RateQuote {
                        rate: self.fallback_rate,
                        source: RateSource::Fallback,
                    },
                }
            }
        }
    }

    /// The current ZEC-per-BTC rate.
    pub async fn get_rate(&self) -> f64 {
        self.resolve_rate().await.rate
    }

    /// Price a BTC amount in ZEC at the current rate.
    ///
    /// Fails only with [`ExchangeError::RateUnavailable`] when even the
    /// fallback chain produced an unusable number, which indicates
    /// broken configuration rather than a provider outage.
    pub async fn convert(&self, btc_amount: f64) -> Result<ConversionResult, ExchangeError> {
        let quote = self.resolve_rate().await;

        if !quote.rate.is_finite() || quote.rate <= 0.0 {
            return Err(ExchangeError::RateUnavailable(format!(
                "resolved rate {} is not a positive number",
                quote.rate
            )));
        }

        if quote.source.is_degraded() {
            warn!(source = %quote.source, rate = quote.rate, "Pricing conversion with degraded rate");
        }

        Ok(ConversionResult {
            btc_amount,
            zec_amount: btc_amount * quote.rate,
            exchange_rate: quote.rate,
            source: quote.source,
            timestamp: Utc::now(),
            note: ADVISORY_NOTE,
        })
    }

    pub async fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            enabled: self.enabled,
            provider: self.provider.id(),
            mode: EXECUTION_MODE,
            cached_entries: self.cache.len().await,
        }
    }

    /// Conversion tracking is not a real state machine; every id gets
    /// the same answer.
    pub fn conversion_status(&self, id: &str) -> ConversionStatus {
        ConversionStatus {
            id: id.to_string(),
            state: "unsupported",
            detail: "conversion tracking is not implemented",
        }
    }

    /// Deliberately inert. Never touches the network or any funds, for
    /// any amount.
    pub fn execute_exchange(&self, _btc_amount: f64) -> Result<(), ExchangeError> {
        Err(ExchangeError::NotImplemented)
    }
}
