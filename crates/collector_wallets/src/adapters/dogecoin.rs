//! Dogecoin: dogechain.info plain-text balances, DogeAPI price.

use async_trait::async_trait;
use collector_cache::CacheControl;

use super::{AdapterServices, CoinAdapter, address_url, check_currency, operation_key};
use crate::coin::Coin;
use crate::error::WalletError;
use crate::keypair::{self, Keypair};

const COIN: Coin = Coin::Dogecoin;

/// DogeAPI is only queried for a USD conversion.
const PRICE_CURRENCIES: &[&str] = &["usd"];

pub struct DogecoinAdapter {
    services: AdapterServices,
}

impl DogecoinAdapter {
    pub fn new(services: AdapterServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CoinAdapter for DogecoinAdapter {
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
        let currency = check_currency(COIN, currency, Some(PRICE_CURRENCIES))?;
        let key = operation_key(COIN, "fiat_exchange", &(&currency,));
        self.services
            .cached_json_number(&key, control, COIN.endpoints().price[0], "/data/amount", 1.0)
            .await
    }

    fn generate_new_keypair(&self) -> Result<Keypair, WalletError> {
        keypair::generate(keypair::DOGECOIN)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::test_support::{MockHttp, Reply, services};
    use super::*;

    const ADDR: &str = "DH5yaieqoZN36fDVciNyRueRGvGLR3mr7L";

    #[tokio::test]
    async fn value_parses_plain_text_body() {
        let http = MockHttp::new();
        http.reply(
            format!("https://dogechain.info/chain/Dogecoin/q/addressbalance/{ADDR}"),
            Reply::Text("1024.5\n"),
        );
        let (services, _) = services(http);

        let value = DogecoinAdapter::new(services)
            .value(ADDR, CacheControl::NORMAL)
            .await
            .unwrap();
        assert_eq!(value, 1024.5);
    }

    #[tokio::test]
    async fn garbage_body_is_a_parse_error() {
        let http = MockHttp::new();
        http.reply(
            format!("https://dogechain.info/chain/Dogecoin/q/addressbalance/{ADDR}"),
            Reply::Text("ERROR: invalid address"),
        );
        let (services, store) = services(http);

        let err = DogecoinAdapter::new(services)
            .value(ADDR, CacheControl::NORMAL)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::UpstreamParse(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn fiat_exchange_reads_converted_amount() {
        let http = MockHttp::new();
        http.reply(
            "https://www.dogeapi.com/wow/v2/?a=get_current_price&convert_to=USD&amount_doge=1",
            Reply::Json(json!({"data": {"amount": 0.00045}})),
        );
        let (services, _) = services(http);

        let rate = DogecoinAdapter::new(services)
            .fiat_exchange("usd", CacheControl::NORMAL)
            .await
            .unwrap();
        assert_eq!(rate, 0.00045);
    }

    #[tokio::test]
    async fn only_usd_is_offered() {
        let (services, _) = services(MockHttp::new());
        let err = DogecoinAdapter::new(services)
            .fiat_exchange("eur", CacheControl::NORMAL)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::UnsupportedCurrency { .. }));
    }

    #[tokio::test]
    async fn transactions_are_unsupported() {
        let (services, _) = services(MockHttp::new());
        let err = DogecoinAdapter::new(services)
            .transactions(ADDR, CacheControl::NORMAL)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WalletError::UnsupportedOperation { coin: Coin::Dogecoin, operation: "transactions" }
        ));
    }
}
