//! Fixtures for the cross-crate flows: a merchant client and a gateway
//! client holding mirrored key pairs.

use yeepay_core::{ClientConfig, KeyConfig, KeySource};
use yeepay_crypto::test_utils::{gateway, merchant, Party};
use yeepay_crypto::{private_key_to_pem, public_key_to_pem};
use yeepay_sdk::YeepayClient;

pub const MERCHANT_ACCOUNT: &str = "10000418926";

/// Config for a party whose counterparty is `peer`, keys inline.
pub fn config_for(own: &Party, peer: &Party) -> ClientConfig {
    let private_pem = private_key_to_pem(&own.private_key).expect("fixture private key encodes");
    let keys = KeyConfig {
        merchant_private_key: KeySource::Inline(private_pem.as_str().to_owned()),
        merchant_public_key: None,
        yeepay_public_key: KeySource::Inline(public_key_to_pem(&peer.public_key).expect("fixture public key encodes")),
    };
    ClientConfig::new(MERCHANT_ACCOUNT, keys)
}

pub fn merchant_client() -> YeepayClient {
    YeepayClient::new(config_for(merchant(), gateway())).expect("merchant client")
}

/// The gateway's view: its own keys, the merchant as counterparty.
pub fn gateway_client() -> YeepayClient {
    YeepayClient::new(config_for(gateway(), merchant())).expect("gateway client")
}
