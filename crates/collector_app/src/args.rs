use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};
use collector_wallets::CacheControl;

#[derive(Parser, Debug)]
#[command(author, version, about = "Balances, prices and keys for several coins")]
pub(crate) struct Cli {
    /// Config file (default: ~/.collector/config.json).
    #[arg(long, value_hint = ValueHint::FilePath, env = "COLLECTOR_CONFIG", global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "warn,collector_wallets=info", global = true)]
    pub(crate) log: String,

    #[command(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// List supported coins
    Coins,

    /// Balance of an address in coin units
    Balance(AddressArgs),

    /// Balance, exchange rate and fiat value of an address
    Price(PriceArgs),

    /// Transactions of an address
    Transactions(AddressArgs),

    /// Generate a new address and private key
    Keypair {
        /// Coin code, e.g. btc
        coin: String,
    },
}

#[derive(Args, Debug)]
pub(crate) struct AddressArgs {
    /// Coin code, e.g. btc
    pub(crate) coin: String,

    /// Public address to look up
    pub(crate) address: String,

    #[command(flatten)]
    pub(crate) cache: CacheArgs,
}

#[derive(Args, Debug)]
pub(crate) struct PriceArgs {
    #[command(flatten)]
    pub(crate) target: AddressArgs,

    /// Fiat currency (default from config)
    #[arg(long)]
    pub(crate) currency: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct CacheArgs {
    /// Always query upstream; do not touch the cache
    #[arg(long)]
    pub(crate) bypass_cache: bool,

    /// Query upstream and overwrite the cached value
    #[arg(long, conflicts_with = "bypass_cache")]
    pub(crate) hard_refresh: bool,
}

impl CacheArgs {
    pub(crate) fn control(&self) -> CacheControl {
        CacheControl {
            bypass_cache: self.bypass_cache,
            hard_refresh: self.hard_refresh,
        }
    }
}
