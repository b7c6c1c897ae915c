//! Vertcoin: explorer plain-text balances, Cryptocoin Charts price.

use async_trait::async_trait;
use collector_cache::CacheControl;

use super::{AdapterServices, CoinAdapter, address_url, check_currency, operation_key};
use crate::coin::{Coin, fill_template};
use crate::error::WalletError;

const COIN: Coin = Coin::Vertcoin;

pub struct VertcoinAdapter {
    services: AdapterServices,
}

impl VertcoinAdapter {
    pub fn new(services: AdapterServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CoinAdapter for VertcoinAdapter {
    fn coin(&self) -> Coin {
        COIN
    }

    async fn value(&self, address: &str, control: CacheControl) -> Result<f64, WalletError> {
        let key = operation_key(COIN, "value", &(address,));
        let url = address_url(COIN.endpoints().balance, address);
        self.services.cached_text_number(&key, control, &url).await
    }

    async fn fiat_exchange(
        &self,
        currency: &str,
        control: CacheControl,
    ) -> Result<f64, WalletError> {
        let currency = check_currency(COIN, currency, None)?;
        let key = operation_key(COIN, "fiat_exchange", &(&currency,));
        let url = fill_template(COIN.endpoints().price[0], "", &currency);
        self.services
            .cached_json_number(&key, control, &url, "/price", 1.0)
            .await
    }
}
