//! Errors surfaced by coin adapters.

use crate::coin::Coin;

/// Everything a wallet capability call can fail with.
///
/// `Upstream*` variants mean "temporarily unavailable, try again"; the
/// `Unsupported*` variants mean "this will never work for this coin".
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Network failure, non-2xx status, or timeout talking to an explorer or ticker.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream answered, but not in the expected shape.
    #[error("Upstream response could not be parsed: {0}")]
    UpstreamParse(String),

    /// The capability is not implemented for this coin.
    #[error("{operation} is not supported for {coin}")]
    UnsupportedOperation { coin: Coin, operation: &'static str },

    /// The coin's price source has no rate for this fiat currency.
    #[error("{coin} price source has no rate for currency '{currency}'")]
    UnsupportedCurrency { coin: Coin, currency: String },

    /// No adapter is registered under this coin code.
    #[error("Unknown coin code: {0}")]
    UnknownCoin(String),

    /// Key material could not be produced.
    #[error("Keypair generation failed: {0}")]
    Keypair(String),
}

impl WalletError {
    pub(crate) fn unsupported(coin: Coin, operation: &'static str) -> Self {
        Self::UnsupportedOperation { coin, operation }
    }

    /// Whether retrying the same call later might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable(_) | Self::UpstreamParse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_are_retryable() {
        assert!(WalletError::UpstreamUnavailable("timeout".into()).is_retryable());
        assert!(WalletError::UpstreamParse("missing field".into()).is_retryable());
    }

    #[test]
    fn unsupported_errors_are_final() {
        assert!(!WalletError::unsupported(Coin::Vertcoin, "send_to_address").is_retryable());
        let currency = WalletError::UnsupportedCurrency {
            coin: Coin::Dogecoin,
            currency: "eur".into(),
        };
        assert!(!currency.is_retryable());
        assert!(!WalletError::UnknownCoin("xyz".into()).is_retryable());
    }

    #[test]
    fn messages_name_the_coin() {
        let err = WalletError::unsupported(Coin::Nextcoin, "transactions");
        assert_eq!(err.to_string(), "transactions is not supported for Next");
        let err = WalletError::UnsupportedCurrency {
            coin: Coin::Litecoin,
            currency: "jpy".into(),
        };
        assert_eq!(
            err.to_string(),
            "Litecoin price source has no rate for currency 'jpy'"
        );
    }
}
