use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use zenrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the current ZEC per BTC rate
    Rate,
    /// Price a BTC amount in ZEC (advisory only)
    Convert {
        /// BTC amount to price
        amount: f64,
    },
    /// Show service status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(Commands::Rate) => zenrate::run_command(zenrate::AppCommand::Rate, config_path).await,
        Some(Commands::Convert { amount }) => {
            zenrate::run_command(zenrate::AppCommand::Convert { amount }, config_path).await
        }
        Some(Commands::Status) => {
            zenrate::run_command(zenrate::AppCommand::Status, config_path).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = zenrate::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
enabled: true
provider: "coingecko"   # coingecko | binance | kraken
fallback_rate: 1.0
cache_ttl_ms: 60000

providers:
  coingecko:
    base_url: "https://api.coingecko.com"
  binance:
    base_url: "https://api.binance.com"
  kraken:
    base_url: "https://api.kraken.com"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
