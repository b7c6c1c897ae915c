//! Litecoin: blockr explorer, btc-e ticker.

use async_trait::async_trait;
use collector_cache::CacheControl;
use serde_json::Value;

use super::{AdapterServices, CoinAdapter, address_url, check_currency, operation_key};
use crate::coin::{Coin, fill_template};
use crate::error::WalletError;
use crate::keypair::{self, Keypair};

const COIN: Coin = Coin::Litecoin;

/// Pairs btc-e quotes against LTC.
const TICKER_CURRENCIES: &[&str] = &["usd", "eur", "rur", "btc"];

pub struct LitecoinAdapter {
    services: AdapterServices,
}

impl LitecoinAdapter {
    pub fn new(services: AdapterServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CoinAdapter for LitecoinAdapter {
    fn coin(&self) -> Coin {
        COIN
    }

    async fn value(&self, address: &str, control: CacheControl) -> Result<f64, WalletError> {
        let key = operation_key(COIN, "value", &(address,));
        let url = address_url(COIN.endpoints().balance, address);
        self.services
            .cached_json_number(&key, control, &url, "/data/balance", 1.0)
            .await
    }

    async fn fiat_exchange(
        &self,
        currency: &str,
        control: CacheControl,
    ) -> Result<f64, WalletError> {
        let currency = check_currency(COIN, currency, Some(TICKER_CURRENCIES))?;
        let key = operation_key(COIN, "fiat_exchange", &(&currency,));
        let url = fill_template(COIN.endpoints().price[0], "", &currency);
        self.services
            .cached_json_number(&key, control, &url, "/ticker/avg", 1.0)
            .await
    }

    async fn transactions(
        &self,
        address: &str,
        control: CacheControl,
    ) -> Result<Vec<Value>, WalletError> {
        let Some(template) = COIN.endpoints().transactions else {
            return Err(WalletError::unsupported(COIN, "transactions"));
        };
        let key = operation_key(COIN, "transactions", &(address,));
        let url = address_url(template, address);
        self.services
            .cached_json_array(&key, control, &url, "/data/txs")
            .await
    }

    fn generate_new_keypair(&self) -> Result<Keypair, WalletError> {
        keypair::generate(keypair::LITECOIN)
    }
}
