//! Coin adapters and the registry that selects them.
//!
//! Every coin implements [`CoinAdapter`] against its own explorer and price
//! endpoints. Network-backed calls go through the shared [`ResultCache`];
//! callers steer it per call with a [`CacheControl`].

pub mod bitcoin;
pub mod dogecoin;
pub mod feathercoin;
pub mod litecoin;
pub mod nextcoin;
pub mod peercoin;
pub mod vertcoin;

use std::sync::Arc;

use async_trait::async_trait;
use collector_cache::{CacheControl, CacheKey, ResultCache};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::coin::{Coin, fill_template};
use crate::error::WalletError;
use crate::http::{HttpFetch, array_at, number_at, parse_number};
use crate::keypair::Keypair;
use crate::wallet::{Wallet, WalletRecord};

pub use bitcoin::BitcoinAdapter;
pub use dogecoin::DogecoinAdapter;
pub use feathercoin::FeathercoinAdapter;
pub use litecoin::LitecoinAdapter;
pub use nextcoin::NextcoinAdapter;
pub use peercoin::PeercoinAdapter;
pub use vertcoin::VertcoinAdapter;

/// Divisor for coins whose APIs report integer base units (satoshi, NQT).
pub(crate) const BASE_UNITS_PER_COIN: f64 = 100_000_000.0;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The capability set every coin exposes.
///
/// Exchange rates follow this crate's convention: native-coin units per one
/// unit of fiat, so `balance * fiat_exchange(currency)` is the fiat value.
#[async_trait]
pub trait CoinAdapter: Send + Sync {
    fn coin(&self) -> Coin;

    /// Balance of `address` in native coin units.
    async fn value(&self, address: &str, control: CacheControl) -> Result<f64, WalletError>;

    /// Exchange rate for `currency` (lowercase fiat code).
    async fn fiat_exchange(&self, currency: &str, control: CacheControl)
    -> Result<f64, WalletError>;

    /// Transactions touching `address`, in the order the explorer lists them.
    async fn transactions(
        &self,
        address: &str,
        control: CacheControl,
    ) -> Result<Vec<Value>, WalletError> {
        let _ = (address, control);
        Err(WalletError::unsupported(self.coin(), "transactions"))
    }

    /// Send `amount` to `address`. No coin implements signing; this always
    /// fails rather than pretending a transaction went out.
    async fn send_to_address(&self, address: &str, amount: f64) -> Result<String, WalletError> {
        let _ = (address, amount);
        Err(WalletError::unsupported(self.coin(), "send_to_address"))
    }

    /// Create a new address and private key offline.
    fn generate_new_keypair(&self) -> Result<Keypair, WalletError> {
        Err(WalletError::unsupported(self.coin(), "generate_new_keypair"))
    }
}

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

/// Collaborators injected into every adapter.
#[derive(Clone)]
pub struct AdapterServices {
    pub http: Arc<dyn HttpFetch>,
    pub cache: ResultCache,
}

impl AdapterServices {
    pub fn new(http: Arc<dyn HttpFetch>, cache: ResultCache) -> Self {
        Self { http, cache }
    }

    /// Cached GET of `url`, reading the number at `pointer` and dividing by
    /// `divisor`.
    pub(crate) async fn cached_json_number(
        &self,
        key: &CacheKey,
        control: CacheControl,
        url: &str,
        pointer: &str,
        divisor: f64,
    ) -> Result<f64, WalletError> {
        let http = &self.http;
        self.cache
            .call(key, control, move || async move {
                let body = http.get_json(url).await?;
                Ok(number_at(&body, pointer)? / divisor)
            })
            .await
    }

    /// Cached GET of `url`, returning the array at `pointer` in upstream order.
    pub(crate) async fn cached_json_array(
        &self,
        key: &CacheKey,
        control: CacheControl,
        url: &str,
        pointer: &str,
    ) -> Result<Vec<Value>, WalletError> {
        let http = &self.http;
        self.cache
            .call(key, control, move || async move {
                let body = http.get_json(url).await?;
                array_at(&body, pointer)
            })
            .await
    }

    /// Cached GET of `url` whose whole body is a number.
    pub(crate) async fn cached_text_number(
        &self,
        key: &CacheKey,
        control: CacheControl,
        url: &str,
    ) -> Result<f64, WalletError> {
        let http = &self.http;
        self.cache
            .call(key, control, move || async move {
                let body = http.get_text(url).await?;
                parse_number(&body)
            })
            .await
    }
}

/// Cache key for `operation` on `coin` with the given positional arguments.
pub(crate) fn operation_key<A: Serialize + ?Sized>(
    coin: Coin,
    operation: &str,
    args: &A,
) -> CacheKey {
    CacheKey::new(format!("{}.{operation}", coin.code())).positional(args)
}

/// URL for `template` with the wallet address filled in.
pub(crate) fn address_url(template: &str, address: &str) -> String {
    fill_template(template, address, "")
}

/// Lowercase `currency` and check it against the coin's price source.
///
/// `supported = None` means the upstream decides which codes exist.
pub(crate) fn check_currency(
    coin: Coin,
    currency: &str,
    supported: Option<&[&str]>,
) -> Result<String, WalletError> {
    let currency = currency.trim().to_ascii_lowercase();
    let known = !currency.is_empty()
        && currency.chars().all(|c| c.is_ascii_alphanumeric())
        && supported.is_none_or(|codes| codes.contains(&currency.as_str()));
    if known {
        Ok(currency)
    } else {
        Err(WalletError::UnsupportedCurrency { coin, currency })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps coins to their adapters.
///
/// All adapters share one HTTP client and one cache store. The registry is
/// cheap to clone.
#[derive(Clone)]
pub struct AdapterRegistry {
    services: AdapterServices,
}

impl AdapterRegistry {
    pub fn new(services: AdapterServices) -> Self {
        Self { services }
    }

    /// Every coin this registry can serve.
    pub fn coins(&self) -> &'static [Coin] {
        &Coin::ALL
    }

    pub fn adapter(&self, coin: Coin) -> Arc<dyn CoinAdapter> {
        let services = self.services.clone();
        match coin {
            Coin::Bitcoin => Arc::new(BitcoinAdapter::new(services)),
            Coin::Litecoin => Arc::new(LitecoinAdapter::new(services)),
            Coin::Dogecoin => Arc::new(DogecoinAdapter::new(services)),
            Coin::Peercoin => Arc::new(PeercoinAdapter::new(services)),
            Coin::Feathercoin => Arc::new(FeathercoinAdapter::new(services)),
            Coin::Vertcoin => Arc::new(VertcoinAdapter::new(services)),
            Coin::Nextcoin => Arc::new(NextcoinAdapter::new(services)),
        }
    }

    /// Look up an adapter by short code such as `"btc"`.
    pub fn adapter_by_code(&self, code: &str) -> Result<Arc<dyn CoinAdapter>, WalletError> {
        Ok(self.adapter(code.parse()?))
    }

    /// Bind a wallet record to its coin's adapter.
    pub fn wallet(&self, record: WalletRecord) -> Wallet {
        let adapter = self.adapter(record.coin());
        Wallet::new(record, adapter)
    }

    /// Create a wallet record for `owner` holding a freshly generated keypair.
    pub fn generate_wallet(
        &self,
        owner: impl Into<String>,
        coin: Coin,
    ) -> Result<WalletRecord, WalletError> {
        let keypair = self.adapter(coin).generate_new_keypair()?;
        let record = WalletRecord::new(owner, coin, keypair.address)
            .with_private_key(keypair.private_key);
        info!(wallet_id = %record.id(), coin = coin.code(), "generated new wallet");
        Ok(record)
    }
}
