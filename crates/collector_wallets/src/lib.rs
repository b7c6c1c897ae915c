//! Multi-coin wallet core.
//!
//! Balance, fiat value, transaction history and keypair generation for seven
//! coins behind one [`CoinAdapter`] trait. Explorer and ticker lookups are
//! memoized through [`collector_cache::ResultCache`].
//!
//! ```rust,no_run
//! use collector_wallets::{CacheControl, CollectorConfig, Coin, WalletRecord};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = CollectorConfig::default().build_registry()?;
//! let wallet = registry.wallet(WalletRecord::new(
//!     "alice",
//!     Coin::Bitcoin,
//!     "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
//! ));
//! let summary = wallet.price_summary("usd", CacheControl::NORMAL).await?;
//! println!("{} BTC = {} USD", summary.wallet_value, summary.fiat_value);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod coin;
pub mod config;
pub mod error;
pub mod http;
pub mod keypair;
pub mod logging;
pub mod wallet;

pub use adapters::{AdapterRegistry, AdapterServices, CoinAdapter};
pub use coin::{Coin, CoinEndpoints};
pub use collector_cache::{CacheControl, CacheKey, CacheStore, FileCache, MemoryCache, ResultCache};
pub use config::CollectorConfig;
pub use error::WalletError;
pub use http::{HttpFetch, ReqwestFetcher};
pub use keypair::Keypair;
pub use wallet::{DEFAULT_CURRENCY, PriceSummary, Wallet, WalletRecord};
