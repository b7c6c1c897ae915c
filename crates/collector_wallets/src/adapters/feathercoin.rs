//! Feathercoin: api.feathercoin.com for both balance and price.
//!
//! This adapter reports a zero balance when the balance response cannot be
//! parsed. That leniency is carried as [`ParsePolicy::ZeroOnParseError`] so it
//! stays visible and confined to this coin; it still needs a product decision.

use async_trait::async_trait;
use collector_cache::CacheControl;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use super::{AdapterServices, CoinAdapter, address_url, check_currency, operation_key};
use crate::coin::Coin;
use crate::error::WalletError;
use crate::http::number_at;
use crate::keypair::{self, Keypair};

const COIN: Coin = Coin::Feathercoin;

/// What to do when an upstream answers with an unparseable balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Surface [`WalletError::UpstreamParse`].
    Strict,
    /// Report a balance of zero. Upstream unavailability is still an error.
    ZeroOnParseError,
}

impl ParsePolicy {
    fn apply(self, parsed: Result<f64, WalletError>) -> Result<f64, WalletError> {
        match (self, parsed) {
            (ParsePolicy::ZeroOnParseError, Err(WalletError::UpstreamParse(reason))) => {
                warn!(coin = COIN.code(), %reason, "unparseable balance, reporting zero");
                Ok(0.0)
            }
            (_, parsed) => parsed,
        }
    }
}

pub struct FeathercoinAdapter {
    services: AdapterServices,
    balance_policy: ParsePolicy,
}

impl FeathercoinAdapter {
    pub fn new(services: AdapterServices) -> Self {
        Self {
            services,
            balance_policy: ParsePolicy::ZeroOnParseError,
        }
    }

    pub fn with_balance_policy(mut self, policy: ParsePolicy) -> Self {
        self.balance_policy = policy;
        self
    }

    pub fn balance_policy(&self) -> ParsePolicy {
        self.balance_policy
    }
}

#[async_trait]
impl CoinAdapter for FeathercoinAdapter {
    fn coin(&self) -> Coin {
        COIN
    }

    async fn value(&self, address: &str, control: CacheControl) -> Result<f64, WalletError> {
        let policy = self.balance_policy;
        // A lenient zero must never be served to a strict caller.
        let key = operation_key(COIN, "value", &(address,)).keyword(&json!({ "policy": policy }));
        let url = address_url(COIN.endpoints().balance, address);
        let http = &self.services.http;
        let url = url.as_str();
        self.services
            .cache
            .call(&key, control, move || async move {
                let parsed = match http.get_json(url).await {
                    Ok(body) => number_at(&body, "/balance"),
                    Err(e @ WalletError::UpstreamParse(_)) => Err(e),
                    Err(e) => return Err(e),
                };
                policy.apply(parsed)
            })
            .await
    }

    async fn fiat_exchange(
        &self,
        currency: &str,
        control: CacheControl,
    ) -> Result<f64, WalletError> {
        let currency = check_currency(COIN, currency, None)?;
        let key = operation_key(COIN, "fiat_exchange", &(&currency,));
        let url = COIN.endpoints().price[0];
        let http = &self.services.http;
        let field = format!("/{currency}");
        let field = field.as_str();
        self.services
            .cache
            .call(&key, control, move || async move {
                let body = http.get_json(url).await?;
                if body.pointer(field).is_none() {
                    return Err(WalletError::UnsupportedCurrency {
                        coin: COIN,
                        currency: field.trim_start_matches('/').to_string(),
                    });
                }
                number_at(&body, field)
            })
            .await
    }

    fn generate_new_keypair(&self) -> Result<Keypair, WalletError> {
        keypair::generate(keypair::FEATHERCOIN)
    }
}
