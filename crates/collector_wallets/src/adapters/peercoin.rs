//! Peercoin: blockr explorer; price derived through BTC.
//!
//! The price source only quotes PPC against BTC, so the fiat rate takes two
//! lookups: PPC's BTC market value, then BTC's rate against the fiat currency.

use async_trait::async_trait;
use collector_cache::CacheControl;
use serde_json::Value;
use tracing::debug;

use super::{AdapterServices, CoinAdapter, address_url, check_currency, operation_key};
use crate::coin::Coin;
use crate::error::WalletError;
use crate::http::number_at;
use crate::keypair::{self, Keypair};

const COIN: Coin = Coin::Peercoin;

/// blockr's exchange-rate feed is USD-based.
const PRICE_CURRENCIES: &[&str] = &["usd"];

pub struct PeercoinAdapter {
    services: AdapterServices,
}

impl PeercoinAdapter {
    pub fn new(services: AdapterServices) -> Self {
        Self { services }
    }
}

/// Combine the PPC-in-BTC quote with the BTC-per-fiat rate.
pub fn derive_rate(intermediate: f64, reference: f64) -> Result<f64, WalletError> {
    if reference == 0.0 {
        return Err(WalletError::UpstreamParse(
            "reference BTC rate is zero".into(),
        ));
    }
    Ok(intermediate / reference)
}

#[async_trait]
impl CoinAdapter for PeercoinAdapter {
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
        let currency = check_currency(COIN, currency, Some(PRICE_CURRENCIES))?;
        let key = operation_key(COIN, "fiat_exchange", &(&currency,));
        let [coin_info_url, rates_url] = COIN.endpoints().price else {
            return Err(WalletError::unsupported(COIN, "fiat_exchange"));
        };
        let http = &self.services.http;
        self.services
            .cache
            .call(&key, control, move || async move {
                let info = http.get_json(coin_info_url).await?;
                let intermediate = number_at(&info, "/data/markets/btce/value")?;

                let rates = http.get_json(rates_url).await?;
                let reference = number_at(&rates, "/data/0/rates/BTC")?;

                debug!(intermediate, reference, "derived peercoin rate inputs");
                derive_rate(intermediate, reference)
            })
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
        keypair::generate(keypair::PEERCOIN)
    }
}
