//! Bitcoin: blockchain.info balances, Coinbase spot rate, blockr transactions.

use async_trait::async_trait;
use collector_cache::CacheControl;
use serde_json::Value;

use super::{
    AdapterServices, BASE_UNITS_PER_COIN, CoinAdapter, address_url, check_currency,
    operation_key,
};
use crate::coin::{Coin, fill_template};
use crate::error::WalletError;
use crate::keypair::{self, Keypair};

const COIN: Coin = Coin::Bitcoin;

pub struct BitcoinAdapter {
    services: AdapterServices,
}

impl BitcoinAdapter {
    pub fn new(services: AdapterServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CoinAdapter for BitcoinAdapter {
    fn coin(&self) -> Coin {
        COIN
    }

    async fn value(&self, address: &str, control: CacheControl) -> Result<f64, WalletError> {
        let key = operation_key(COIN, "value", &(address,));
        let url = address_url(COIN.endpoints().balance, address);
        self.services
            .cached_json_number(&key, control, &url, "/final_balance", BASE_UNITS_PER_COIN)
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
            .cached_json_number(&key, control, &url, "/amount", 1.0)
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
        keypair::generate(keypair::BITCOIN)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::test_support::{MockHttp, Reply, services};
    use super::*;

    const ADDR: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

    fn balance_url() -> String {
        format!("http://blockchain.info/address/{ADDR}?format=json")
    }

    #[tokio::test]
    async fn value_divides_satoshis() {
        let http = MockHttp::new();
        http.reply(balance_url(), Reply::Json(json!({"final_balance": "250000000"})));
        let (services, _) = services(http.clone());

        let value = BitcoinAdapter::new(services)
            .value(ADDR, CacheControl::NORMAL)
            .await
            .unwrap();
        assert_eq!(value, 2.5);
    }

    #[tokio::test]
    async fn value_accepts_numeric_field() {
        let http = MockHttp::new();
        http.reply(balance_url(), Reply::Json(json!({"final_balance": 1})));
        let (services, _) = services(http.clone());

        let value = BitcoinAdapter::new(services)
            .value(ADDR, CacheControl::NORMAL)
            .await
            .unwrap();
        assert_eq!(value, 1e-8);
    }

    #[tokio::test]
    async fn value_is_cached_per_address() {
        let http = MockHttp::new();
        http.reply(balance_url(), Reply::Json(json!({"final_balance": 100000000})));
        let (services, store) = services(http.clone());
        let adapter = BitcoinAdapter::new(services);

        adapter.value(ADDR, CacheControl::NORMAL).await.unwrap();
        adapter.value(ADDR, CacheControl::NORMAL).await.unwrap();
        assert_eq!(http.calls(), 1);
        assert_eq!(store.len(), 1);

        adapter.value(ADDR, CacheControl::bypass()).await.unwrap();
        assert_eq!(http.calls(), 2);
    }

    #[tokio::test]
    async fn fiat_exchange_reads_spot_amount() {
        let http = MockHttp::new();
        http.reply(
            "https://coinbase.com/api/v1/prices/spot_rate?currency=USD",
            Reply::Json(json!({"amount": "500.00", "currency": "USD"})),
        );
        let (services, _) = services(http.clone());

        let rate = BitcoinAdapter::new(services)
            .fiat_exchange("usd", CacheControl::NORMAL)
            .await
            .unwrap();
        assert_eq!(rate, 500.0);
    }

    #[tokio::test]
    async fn missing_amount_is_a_parse_error() {
        let http = MockHttp::new();
        http.reply(
            "https://coinbase.com/api/v1/prices/spot_rate?currency=EUR",
            Reply::Json(json!({"errors": ["unknown currency"]})),
        );
        let (services, store) = services(http.clone());

        let err = BitcoinAdapter::new(services)
            .fiat_exchange("EUR", CacheControl::NORMAL)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::UpstreamParse(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn transactions_keep_explorer_order() {
        let http = MockHttp::new();
        http.reply(
            format!("http://btc.blockr.io/api/v1/address/txs/{ADDR}"),
            Reply::Json(json!({"data": {"txs": [{"tx": "newest"}, {"tx": "oldest"}]}})),
        );
        let (services, _) = services(http.clone());

        let txs = BitcoinAdapter::new(services)
            .transactions(ADDR, CacheControl::NORMAL)
            .await
            .unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0]["tx"], "newest");
        assert_eq!(txs[1]["tx"], "oldest");
    }

    #[test]
    fn generates_mainnet_addresses() {
        let (services, _) = services(MockHttp::new());
        let keypair = BitcoinAdapter::new(services).generate_new_keypair().unwrap();
        assert!(keypair.address.starts_with('1'));
        assert!(keypair.private_key.starts_with('K') || keypair.private_key.starts_with('L'));
    }
}
