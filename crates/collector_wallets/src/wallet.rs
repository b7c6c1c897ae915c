//! Wallet records and the coin-independent operations over them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use collector_cache::CacheControl;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::CoinAdapter;
use crate::coin::Coin;
use crate::error::WalletError;

/// Currency used when a caller does not name one.
pub const DEFAULT_CURRENCY: &str = "usd";

/// A wallet as held by the surrounding application.
///
/// The public key is fixed at construction. A record without a private key
/// is watch-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    id: String,
    owner: String,
    created_at: DateTime<Utc>,
    name: String,
    coin: Coin,
    public_key: String,
    private_key: Option<String>,
}

impl WalletRecord {
    /// New watch-only record with a generated id.
    pub fn new(owner: impl Into<String>, coin: Coin, public_key: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.into(),
            created_at: Utc::now(),
            name: String::new(),
            coin,
            public_key: public_key.into(),
            private_key: None,
        }
    }

    /// Use an id assigned by the record store instead of a generated one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coin(&self) -> Coin {
        self.coin
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_deref()
    }
}

impl fmt::Display for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.owner, self.public_key)
    }
}

/// Price information for one wallet in one fiat currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub wallet_value: f64,
    pub fiat_exchange_rate: f64,
    pub fiat_value: f64,
}

impl PriceSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A record bound to its coin's adapter.
#[derive(Clone)]
pub struct Wallet {
    record: WalletRecord,
    adapter: Arc<dyn CoinAdapter>,
}

impl Wallet {
    /// Bind `record` to `adapter`. Outside this crate wallets come from
    /// [`AdapterRegistry::wallet`](crate::adapters::AdapterRegistry::wallet),
    /// which picks the adapter from the record's coin.
    pub(crate) fn new(record: WalletRecord, adapter: Arc<dyn CoinAdapter>) -> Self {
        debug_assert_eq!(
            record.coin(),
            adapter.coin(),
            "wallet record bound to another coin's adapter"
        );
        Self { record, adapter }
    }

    pub fn record(&self) -> &WalletRecord {
        &self.record
    }

    pub fn coin(&self) -> Coin {
        self.record.coin()
    }

    /// `"<symbol>-<id>"`, e.g. `"btc-42"`; how display layers refer to a wallet.
    pub fn display_identity(&self) -> String {
        format!("{}-{}", self.coin().symbol().to_lowercase(), self.record.id())
    }

    pub fn has_private_key(&self) -> bool {
        self.record.private_key().is_some_and(|key| !key.is_empty())
    }

    pub async fn value(&self, control: CacheControl) -> Result<f64, WalletError> {
        self.adapter.value(self.record.public_key(), control).await
    }

    pub async fn fiat_exchange(
        &self,
        currency: &str,
        control: CacheControl,
    ) -> Result<f64, WalletError> {
        self.adapter.fiat_exchange(currency, control).await
    }

    /// Balance converted to `currency`: `value() * fiat_exchange(currency)`.
    pub async fn fiat_value(
        &self,
        currency: &str,
        control: CacheControl,
    ) -> Result<f64, WalletError> {
        let value = self.value(control).await?;
        let rate = self.fiat_exchange(currency, control).await?;
        Ok(value * rate)
    }

    pub async fn transactions(&self, control: CacheControl) -> Result<Vec<Value>, WalletError> {
        self.adapter
            .transactions(self.record.public_key(), control)
            .await
    }

    pub async fn send_to_address(&self, address: &str, amount: f64) -> Result<String, WalletError> {
        self.adapter.send_to_address(address, amount).await
    }

    /// Balance, rate and converted value, fetched once each.
    pub async fn price_summary(
        &self,
        currency: &str,
        control: CacheControl,
    ) -> Result<PriceSummary, WalletError> {
        let wallet_value = self.value(control).await?;
        let fiat_exchange_rate = self.fiat_exchange(currency, control).await?;
        Ok(PriceSummary {
            wallet_value,
            fiat_exchange_rate,
            fiat_value: wallet_value * fiat_exchange_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::AdapterRegistry;
    use crate::adapters::test_support::{MockHttp, Reply, services};

    fn registry(http: Arc<MockHttp>) -> AdapterRegistry {
        let (services, _) = services(http);
        AdapterRegistry::new(services)
    }

    #[test]
    fn display_identity_uses_lowercase_symbol_and_id() {
        let wallet = registry(MockHttp::new())
            .wallet(WalletRecord::new("bob", Coin::Dogecoin, "Dxyz").with_id("42"));
        assert_eq!(wallet.display_identity(), "doge-42");
        assert_eq!(wallet.display_identity(), wallet.display_identity());
    }

    #[test]
    fn display_identity_changes_with_coin() {
        let registry = registry(MockHttp::new());
        let btc = registry.wallet(WalletRecord::new("bob", Coin::Bitcoin, "1x").with_id("7"));
        let ltc = registry.wallet(WalletRecord::new("bob", Coin::Litecoin, "Lx").with_id("7"));
        assert_ne!(btc.display_identity(), ltc.display_identity());
    }

    #[test]
    fn registry_binds_each_record_to_its_own_adapter() {
        let registry = registry(MockHttp::new());
        for coin in Coin::ALL {
            let wallet = registry.wallet(WalletRecord::new("bob", coin, "addr").with_id("1"));
            assert_eq!(wallet.coin(), coin);
            assert_eq!(wallet.adapter.coin(), coin);
            assert!(wallet.display_identity().starts_with(&coin.symbol().to_lowercase()));
        }
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "bound to another coin's adapter")]
    fn mismatched_adapter_is_rejected() {
        let registry = registry(MockHttp::new());
        let record = WalletRecord::new("bob", Coin::Bitcoin, "1x");
        let _ = Wallet::new(record, registry.adapter(Coin::Litecoin));
    }

    #[test]
    fn private_key_presence() {
        let registry = registry(MockHttp::new());
        let watch_only = registry.wallet(WalletRecord::new("a", Coin::Bitcoin, "1x"));
        let empty = registry.wallet(WalletRecord::new("a", Coin::Bitcoin, "1x").with_private_key(""));
        let full = registry.wallet(WalletRecord::new("a", Coin::Bitcoin, "1x").with_private_key("Kx"));
        assert!(!watch_only.has_private_key());
        assert!(!empty.has_private_key());
        assert!(full.has_private_key());
    }

    #[test]
    fn record_display_and_serde() {
        let record = WalletRecord::new("carol", Coin::Peercoin, "PAbc").with_name("Savings");
        assert_eq!(record.to_string(), "carol - PAbc");

        let json = serde_json::to_string(&record).unwrap();
        let parsed: WalletRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id(), record.id());
        assert_eq!(parsed.coin(), Coin::Peercoin);
        assert_eq!(parsed.name(), "Savings");
        assert!(parsed.private_key().is_none());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = WalletRecord::new("a", Coin::Bitcoin, "1x");
        let b = WalletRecord::new("a", Coin::Bitcoin, "1x");
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn fiat_value_is_value_times_rate() {
        let http = MockHttp::new();
        http.reply(
            "https://explorer.vertcoin.org/chain/Vertcoin/q/addressbalance/Vabc",
            Reply::Text("3.3"),
        );
        http.reply(
            "http://www.cryptocoincharts.info/v2/api/tradingPair/vtc_usd",
            Reply::Json(json!({"price": "0.7"})),
        );
        let wallet = registry(http).wallet(WalletRecord::new("a", Coin::Vertcoin, "Vabc"));

        let value = wallet.value(CacheControl::NORMAL).await.unwrap();
        let rate = wallet.fiat_exchange("usd", CacheControl::NORMAL).await.unwrap();
        let fiat = wallet.fiat_value("usd", CacheControl::NORMAL).await.unwrap();
        assert_eq!(fiat, value * rate);
    }

    #[tokio::test]
    async fn price_summary_serializes_all_fields() {
        let http = MockHttp::new();
        http.reply(
            "https://explorer.vertcoin.org/chain/Vertcoin/q/addressbalance/Vabc",
            Reply::Text("2"),
        );
        http.reply(
            "http://www.cryptocoincharts.info/v2/api/tradingPair/vtc_usd",
            Reply::Json(json!({"price": "0.5"})),
        );
        let wallet = registry(http).wallet(WalletRecord::new("a", Coin::Vertcoin, "Vabc"));

        let summary = wallet.price_summary(DEFAULT_CURRENCY, CacheControl::NORMAL).await.unwrap();
        assert_eq!(
            summary,
            PriceSummary {
                wallet_value: 2.0,
                fiat_exchange_rate: 0.5,
                fiat_value: 1.0,
            }
        );
        let json: Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["fiat_value"], 1.0);
        assert!(json.get("wallet_value").is_some());
        assert!(json.get("fiat_exchange_rate").is_some());
    }

    #[tokio::test]
    async fn wallet_transactions_use_public_key() {
        let http = MockHttp::new();
        http.reply(
            "http://ppc.blockr.io/api/v1/address/txs/PAbc",
            Reply::Json(json!({"data": {"txs": [{"tx": "1"}, {"tx": "2"}, {"tx": "3"}]}})),
        );
        let wallet = registry(http).wallet(WalletRecord::new("a", Coin::Peercoin, "PAbc"));

        let txs = wallet.transactions(CacheControl::NORMAL).await.unwrap();
        assert_eq!(txs.len(), 3);
    }

    #[tokio::test]
    async fn wallet_send_is_refused() {
        let wallet = registry(MockHttp::new())
            .wallet(WalletRecord::new("a", Coin::Bitcoin, "1x").with_private_key("Kx"));
        let err = wallet.send_to_address("1y", 0.5).await.unwrap_err();
        assert!(matches!(err, WalletError::UnsupportedOperation { .. }));
    }
}
