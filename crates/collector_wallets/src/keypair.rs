//! Offline keypair generation for base58check P2PKH coins.
//!
//! Addresses are `base58check(version || RIPEMD160(SHA256(pubkey)))` over the
//! compressed secp256k1 public key; private keys are exported as compressed WIF,
//! `base58check(secret_prefix || key || 0x01)`.

use k256::SecretKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::WalletError;

/// Network version bytes for one coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressParams {
    pub pubkey_version: u8,
    pub secret_prefix: u8,
}

pub const BITCOIN: AddressParams = AddressParams {
    pubkey_version: 0x00,
    secret_prefix: 0x80,
};
pub const LITECOIN: AddressParams = AddressParams {
    pubkey_version: 0x30,
    secret_prefix: 0xB0,
};
pub const DOGECOIN: AddressParams = AddressParams {
    pubkey_version: 0x1E,
    secret_prefix: 0x9E,
};
pub const PEERCOIN: AddressParams = AddressParams {
    pubkey_version: 0x37,
    secret_prefix: 0xB7,
};
pub const FEATHERCOIN: AddressParams = AddressParams {
    pubkey_version: 0x0E,
    secret_prefix: 0x8E,
};

/// A freshly generated address and its private key.
#[derive(Clone, Serialize, Deserialize)]
pub struct Keypair {
    pub address: String,
    pub private_key: String,
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Generate a random keypair for the network described by `params`.
pub fn generate(params: AddressParams) -> Result<Keypair, WalletError> {
    // A random 32-byte string is a valid scalar with overwhelming probability;
    // retry the rare out-of-range draw.
    for _ in 0..8 {
        let bytes: [u8; 32] = rand::random();
        if let Ok(secret) = SecretKey::from_bytes((&bytes).into()) {
            return Ok(keypair_from_secret(&secret, params));
        }
    }
    Err(WalletError::Keypair(
        "random source produced no valid secp256k1 scalar".into(),
    ))
}

/// Derive the address and WIF for an existing secret key.
pub fn keypair_from_secret(secret: &SecretKey, params: AddressParams) -> Keypair {
    let pubkey = secret.public_key().to_encoded_point(true);
    let hash160 = Ripemd160::digest(Sha256::digest(pubkey.as_bytes()));

    let mut address_payload = Vec::with_capacity(21);
    address_payload.push(params.pubkey_version);
    address_payload.extend_from_slice(&hash160);

    let mut wif_payload = Vec::with_capacity(34);
    wif_payload.push(params.secret_prefix);
    wif_payload.extend_from_slice(&secret.to_bytes());
    wif_payload.push(0x01);

    Keypair {
        address: bs58::encode(address_payload).with_check().into_string(),
        private_key: bs58::encode(wif_payload).with_check().into_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_one() -> SecretKey {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        SecretKey::from_bytes((&bytes).into()).unwrap()
    }

    fn version_of(encoded: &str) -> u8 {
        bs58::decode(encoded).with_check(None).into_vec().unwrap()[0]
    }

    #[test]
    fn known_bitcoin_vector() {
        let keypair = keypair_from_secret(&secret_one(), BITCOIN);
        assert_eq!(keypair.address, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
        assert_eq!(
            keypair.private_key,
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );
    }

    #[test]
    fn version_bytes_follow_params() {
        for params in [BITCOIN, LITECOIN, DOGECOIN, PEERCOIN, FEATHERCOIN] {
            let keypair = generate(params).unwrap();
            assert_eq!(version_of(&keypair.address), params.pubkey_version);
            assert_eq!(version_of(&keypair.private_key), params.secret_prefix);
        }
    }

    #[test]
    fn familiar_address_prefixes() {
        assert!(generate(BITCOIN).unwrap().address.starts_with('1'));
        assert!(generate(LITECOIN).unwrap().address.starts_with('L'));
        assert!(generate(DOGECOIN).unwrap().address.starts_with('D'));
        assert!(generate(PEERCOIN).unwrap().address.starts_with('P'));
    }

    #[test]
    fn generated_keys_differ() {
        let a = generate(BITCOIN).unwrap();
        let b = generate(BITCOIN).unwrap();
        assert_ne!(a.address, b.address);
        assert_ne!(a.private_key, b.private_key);
    }

    #[test]
    fn debug_redacts_private_key() {
        let keypair = keypair_from_secret(&secret_one(), BITCOIN);
        let rendered = format!("{keypair:?}");
        assert!(!rendered.contains(&keypair.private_key));
        assert!(rendered.contains(&keypair.address));
    }
}
