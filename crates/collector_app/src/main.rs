mod args;

use anyhow::{Context, Result};
use clap::Parser;
use collector_wallets::logging;
use collector_wallets::{Coin, CollectorConfig, WalletRecord};
use tracing::{debug, warn};

use crate::args::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = match logging::init_logging_with_file(&cli.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_logging(&cli.log)?;
            warn!("File logging unavailable, logging to console only: {e}");
            None
        }
    };

    let config_path = match cli.config {
        Some(path) => path,
        None => CollectorConfig::config_path()?,
    };
    let config = CollectorConfig::load_or_default(&config_path);
    debug!(path = %config_path.display(), "configuration loaded");

    let cache_path = CollectorConfig::cache_path()?;
    let registry = config.build_file_registry(&cache_path)?;

    match cli.cmd {
        Command::Coins => {
            for &coin in registry.coins() {
                println!(
                    "{:<5} {:<12} price source: {}",
                    coin.code(),
                    coin.full_name(),
                    coin.price_source()
                );
            }
        }
        Command::Balance(args) => {
            let coin = args.coin.parse::<Coin>()?;
            let wallet = registry.wallet(WalletRecord::new("cli", coin, args.address));
            let value = wallet
                .value(args.cache.control())
                .await
                .with_context(|| format!("balance lookup for {coin} failed"))?;
            println!("{value} {}", coin.symbol());
        }
        Command::Price(args) => {
            let coin = args.target.coin.parse::<Coin>()?;
            let currency = args.currency.unwrap_or_else(|| config.default_currency.clone());
            let wallet = registry.wallet(WalletRecord::new("cli", coin, args.target.address));
            let summary = wallet
                .price_summary(&currency, args.target.cache.control())
                .await
                .with_context(|| format!("price lookup for {coin} failed"))?;
            println!("{}", summary.to_json()?);
        }
        Command::Transactions(args) => {
            let coin = args.coin.parse::<Coin>()?;
            let wallet = registry.wallet(WalletRecord::new("cli", coin, args.address));
            let txs = wallet
                .transactions(args.cache.control())
                .await
                .with_context(|| format!("transaction lookup for {coin} failed"))?;
            println!("{}", serde_json::to_string_pretty(&txs)?);
        }
        Command::Keypair { coin } => {
            let keypair = registry.adapter_by_code(&coin)?.generate_new_keypair()?;
            println!("{}", serde_json::to_string_pretty(&keypair)?);
        }
    }

    Ok(())
}
