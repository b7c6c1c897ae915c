//! Static descriptors for every supported coin.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Supported coins. Adding a coin means adding a variant here, an adapter
/// module, and an arm in [`AdapterRegistry`](crate::adapters::AdapterRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coin {
    #[serde(rename = "btc")]
    Bitcoin,
    #[serde(rename = "ltc")]
    Litecoin,
    #[serde(rename = "doge")]
    Dogecoin,
    #[serde(rename = "ppc")]
    Peercoin,
    #[serde(rename = "ftc")]
    Feathercoin,
    #[serde(rename = "vtc")]
    Vertcoin,
    #[serde(rename = "nxt")]
    Nextcoin,
}

/// URL templates a coin's adapter talks to.
///
/// Placeholders: `{address}` is the wallet's public address, `{currency}` the
/// lowercase fiat code and `{CURRENCY}` the uppercase one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinEndpoints {
    pub balance: &'static str,
    /// Price lookups in the order they are queried.
    pub price: &'static [&'static str],
    pub transactions: Option<&'static str>,
}

impl Coin {
    pub const ALL: [Coin; 7] = [
        Coin::Bitcoin,
        Coin::Litecoin,
        Coin::Dogecoin,
        Coin::Peercoin,
        Coin::Feathercoin,
        Coin::Vertcoin,
        Coin::Nextcoin,
    ];

    /// Short lowercase code used for registry lookup.
    pub fn code(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "btc",
            Coin::Litecoin => "ltc",
            Coin::Dogecoin => "doge",
            Coin::Peercoin => "ppc",
            Coin::Feathercoin => "ftc",
            Coin::Vertcoin => "vtc",
            Coin::Nextcoin => "nxt",
        }
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "BTC",
            Coin::Litecoin => "LTC",
            Coin::Dogecoin => "DOGE",
            Coin::Peercoin => "PPC",
            Coin::Feathercoin => "FTC",
            Coin::Vertcoin => "VTC",
            Coin::Nextcoin => "NXT",
        }
    }

    /// Human-readable name.
    pub fn full_name(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "Bitcoin",
            Coin::Litecoin => "Litecoin",
            Coin::Dogecoin => "Dogecoin",
            Coin::Peercoin => "Peercoin",
            Coin::Feathercoin => "Feathercoin",
            Coin::Vertcoin => "Vertcoin",
            Coin::Nextcoin => "Next",
        }
    }

    /// Where this coin's fiat exchange rate comes from.
    pub fn price_source(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "coinbase.com",
            Coin::Litecoin | Coin::Peercoin => "btc-e",
            Coin::Dogecoin => "dogeapi.com",
            Coin::Feathercoin => "api.feathercoin.com",
            Coin::Vertcoin | Coin::Nextcoin => "cryptocoincharts.info",
        }
    }

    pub fn endpoints(&self) -> &'static CoinEndpoints {
        match self {
            Coin::Bitcoin => &BITCOIN_ENDPOINTS,
            Coin::Litecoin => &LITECOIN_ENDPOINTS,
            Coin::Dogecoin => &DOGECOIN_ENDPOINTS,
            Coin::Peercoin => &PEERCOIN_ENDPOINTS,
            Coin::Feathercoin => &FEATHERCOIN_ENDPOINTS,
            Coin::Vertcoin => &VERTCOIN_ENDPOINTS,
            Coin::Nextcoin => &NEXTCOIN_ENDPOINTS,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

impl FromStr for Coin {
    type Err = WalletError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let code = code.trim().to_ascii_lowercase();
        Coin::ALL
            .into_iter()
            .find(|coin| coin.code() == code)
            .ok_or(WalletError::UnknownCoin(code))
    }
}

/// Substitute the `{address}`, `{currency}` and `{CURRENCY}` placeholders.
///
/// Values are percent-encoded, so an address can never add path segments or
/// query parameters of its own.
pub fn fill_template(template: &str, address: &str, currency: &str) -> String {
    template
        .replace("{address}", &urlencoded(address))
        .replace("{currency}", &urlencoded(&currency.to_ascii_lowercase()))
        .replace("{CURRENCY}", &urlencoded(&currency.to_ascii_uppercase()))
}

fn urlencoded(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

// ---------------------------------------------------------------------------
// Endpoint tables
// ---------------------------------------------------------------------------

const BITCOIN_ENDPOINTS: CoinEndpoints = CoinEndpoints {
    balance: "http://blockchain.info/address/{address}?format=json",
    price: &["https://coinbase.com/api/v1/prices/spot_rate?currency={CURRENCY}"],
    transactions: Some("http://btc.blockr.io/api/v1/address/txs/{address}"),
};

const LITECOIN_ENDPOINTS: CoinEndpoints = CoinEndpoints {
    balance: "http://ltc.blockr.io/api/v1/address/balance/{address}",
    price: &["https://btc-e.com/api/2/ltc_{currency}/ticker"],
    transactions: Some("http://ltc.blockr.io/api/v1/address/txs/{address}"),
};

const DOGECOIN_ENDPOINTS: CoinEndpoints = CoinEndpoints {
    balance: "https://dogechain.info/chain/Dogecoin/q/addressbalance/{address}",
    price: &["https://www.dogeapi.com/wow/v2/?a=get_current_price&convert_to=USD&amount_doge=1"],
    transactions: None,
};

const PEERCOIN_ENDPOINTS: CoinEndpoints = CoinEndpoints {
    balance: "http://ppc.blockr.io/api/v1/address/balance/{address}",
    price: &[
        "http://ppc.blockr.io/api/v1/coin/info",
        "http://ppc.blockr.io/api/v1/exchangerate/current",
    ],
    transactions: Some("http://ppc.blockr.io/api/v1/address/txs/{address}"),
};

const FEATHERCOIN_ENDPOINTS: CoinEndpoints = CoinEndpoints {
    balance: "http://api.feathercoin.com/?output=balance&address={address}&json=1",
    price: &["http://api.feathercoin.com/?output=usd&amount=1&json=1"],
    transactions: None,
};

const VERTCOIN_ENDPOINTS: CoinEndpoints = CoinEndpoints {
    balance: "https://explorer.vertcoin.org/chain/Vertcoin/q/addressbalance/{address}",
    price: &["http://www.cryptocoincharts.info/v2/api/tradingPair/vtc_{currency}"],
    transactions: None,
};

const NEXTCOIN_ENDPOINTS: CoinEndpoints = CoinEndpoints {
    balance: "http://nxtportal.org/nxt?requestType=getAccount&account={address}",
    price: &["http://www.cryptocoincharts.info/v2/api/tradingPair/nxt_{currency}"],
    transactions: None,
};
