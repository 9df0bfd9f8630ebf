//! Advisory BTC→ZEC pricing: provider quotes with a time-bounded cache
//! and a last-known-good → static-rate fallback chain. No trades are
//! executed and no funds move; the crate answers "how much ZEC is N BTC
//! worth right now" and nothing more.

pub mod cli;
pub mod config;
pub mod core;
pub mod providers;
pub mod service;

use crate::config::AppConfig;
use crate::core::{ProviderId, RateProvider};
use crate::providers::{BinanceProvider, CoinGeckoProvider, KrakenProvider};
use crate::service::{ExchangeService, ServiceSettings};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Rate,
    Convert { amount: f64 },
    Status,
}

/// Assemble the exchange service from configuration: adapter dispatch
/// plus cache/fallback settings. Pure construction, no I/O.
pub fn build_service(config: &AppConfig) -> ExchangeService {
    let provider: Box<dyn RateProvider> = match config.provider_id() {
        ProviderId::CoinGecko => {
            let base_url = config
                .providers
                .coingecko
                .as_ref()
                .map_or("https://api.coingecko.com", |p| &p.base_url);
            Box::new(CoinGeckoProvider::new(base_url))
        }
        ProviderId::Binance => {
            let base_url = config
                .providers
                .binance
                .as_ref()
                .map_or("https://api.binance.com", |p| &p.base_url);
            Box::new(BinanceProvider::new(base_url))
        }
        ProviderId::Kraken => {
            let base_url = config
                .providers
                .kraken
                .as_ref()
                .map_or("https://api.kraken.com", |p| &p.base_url);
            Box::new(KrakenProvider::new(base_url))
        }
    };

    ExchangeService::new(
        provider,
        ServiceSettings {
            enabled: config.enabled,
            cache_ttl: config.cache_ttl(),
            fallback_rate: config.fallback_rate,
        },
    )
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("zenrate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let service = build_service(&config);

    match command {
        AppCommand::Rate => {
            let quote = service.resolve_rate().await;
            println!("{}", cli::render_rate(&quote));
        }
        AppCommand::Convert { amount } => {
            let result = service.convert(amount).await?;
            println!("{}", cli::render_conversion(&result));
        }
        AppCommand::Status => {
            let status = service.status().await;
            println!("{}", cli::render_status(&status));
        }
    }

    Ok(())
}
