use crate::core::ProviderId;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_CACHE_TTL_MS: u64 = 60_000;
pub const DEFAULT_FALLBACK_RATE: f64 = 1.0;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderEndpoint {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub coingecko: Option<ProviderEndpoint>,
    pub binance: Option<ProviderEndpoint>,
    pub kraken: Option<ProviderEndpoint>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(ProviderEndpoint {
                base_url: "https://api.coingecko.com".to_string(),
            }),
            binance: Some(ProviderEndpoint {
                base_url: "https://api.binance.com".to_string(),
            }),
            kraken: Some(ProviderEndpoint {
                base_url: "https://api.kraken.com".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Whether the exchange surface is enabled at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Provider selection; unrecognized values resolve to coingecko.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Credentials for authenticated providers. The current adapters
    /// use public endpoints and never send these.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Static rate used when every stronger source fails. Malformed or
    /// non-positive values sanitize to 1.0 at load time.
    #[serde(
        default = "default_fallback_rate",
        deserialize_with = "lenient_fallback_rate"
    )]
    pub fallback_rate: f64,
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "coingecko".to_string()
}

fn default_fallback_rate() -> f64 {
    DEFAULT_FALLBACK_RATE
}

fn default_cache_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL_MS
}

fn sanitize_fallback_rate(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        warn!(
            rate,
            "Invalid fallback_rate in config, using {}", DEFAULT_FALLBACK_RATE
        );
        DEFAULT_FALLBACK_RATE
    }
}

/// Accepts a YAML number or a numeric string; anything else yields the
/// default rather than failing the whole config load.
fn lenient_fallback_rate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    let rate = match Raw::deserialize(deserializer) {
        Ok(Raw::Num(n)) => n,
        Ok(Raw::Text(s)) => s.trim().parse().unwrap_or_else(|_| {
            warn!(
                value = %s,
                "Unparseable fallback_rate in config, using {}", DEFAULT_FALLBACK_RATE
            );
            DEFAULT_FALLBACK_RATE
        }),
        Err(_) => {
            warn!(
                "Non-scalar fallback_rate in config, using {}",
                DEFAULT_FALLBACK_RATE
            );
            DEFAULT_FALLBACK_RATE
        }
    };
    Ok(sanitize_fallback_rate(rate))
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            enabled: default_enabled(),
            provider: default_provider(),
            api_key: None,
            api_secret: None,
            fallback_rate: default_fallback_rate(),
            cache_ttl_ms: default_cache_ttl_ms(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "zenz", "zenrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The configured provider identity; unrecognized selections fall
    /// back to the primary provider.
    pub fn provider_id(&self) -> ProviderId {
        self.provider.parse().unwrap_or(ProviderId::CoinGecko)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}
