//! Nxt: nxtportal account lookups in NQT, Cryptocoin Charts price.

use async_trait::async_trait;
use collector_cache::CacheControl;

use super::{
    AdapterServices, BASE_UNITS_PER_COIN, CoinAdapter, address_url, check_currency,
    operation_key,
};
use crate::coin::{Coin, fill_template};
use crate::error::WalletError;

const COIN: Coin = Coin::Nextcoin;

pub struct NextcoinAdapter {
    services: AdapterServices,
}

impl NextcoinAdapter {
    pub fn new(services: AdapterServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CoinAdapter for NextcoinAdapter {
    fn coin(&self) -> Coin {
        COIN
    }

    async fn value(&self, address: &str, control: CacheControl) -> Result<f64, WalletError> {
        let key = operation_key(COIN, "value", &(address,));
        let url = address_url(COIN.endpoints().balance, address);
        self.services
            .cached_json_number(&key, control, &url, "/balanceNQT", BASE_UNITS_PER_COIN)
            .await
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
