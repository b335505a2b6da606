//! Shared RSA fixtures for tests.
//!
//! Key generation is slow in debug builds, so each party's key pair is
//! generated once per test binary.

use std::sync::OnceLock;

use rand::rngs::OsRng;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::keys::Credentials;

/// Modulus size for fixture keys.
pub const FIXTURE_KEY_BITS: usize = 1024;

/// One side of the exchange.
pub struct Party {
    pub private_key: RsaPrivateKey,
    pub public_key: RsaPublicKey,
}

impl Party {
    fn generate() -> Self {
        let private_key = RsaPrivateKey::new(&mut OsRng, FIXTURE_KEY_BITS).expect("fixture key generation");
        let public_key = private_key.to_public_key();
        Self { private_key, public_key }
    }
}

/// The merchant's key pair.
pub fn merchant() -> &'static Party {
    static MERCHANT: OnceLock<Party> = OnceLock::new();
    MERCHANT.get_or_init(Party::generate)
}

/// The gateway's key pair.
pub fn gateway() -> &'static Party {
    static GATEWAY: OnceLock<Party> = OnceLock::new();
    GATEWAY.get_or_init(Party::generate)
}

/// Merchant-side credentials: own keys are the merchant's, the
/// counterparty is the gateway.
pub fn merchant_credentials(merchant_account: &str) -> Credentials {
    Credentials::new(
        merchant_account,
        merchant().private_key.clone(),
        Some(merchant().public_key.clone()),
        gateway().public_key.clone(),
    )
    .expect("fixture credentials")
}

/// Gateway-side credentials, the mirror image of [`merchant_credentials`].
pub fn gateway_credentials(merchant_account: &str) -> Credentials {
    Credentials::new(
        merchant_account,
        gateway().private_key.clone(),
        Some(gateway().public_key.clone()),
        merchant().public_key.clone(),
    )
    .expect("fixture credentials")
}
