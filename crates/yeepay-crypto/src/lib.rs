//! Yeepay request security pipeline.
//!
//! Parameter canonicalization, the RSA encrypt-as-sign signature, the
//! AES session-key envelope, and RSA wrapping of the session key.

pub mod error;
pub mod canonical;
pub mod keys;
pub mod signing;
pub mod envelope;
pub mod key_wrap;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::CryptoError;
pub use canonical::canonicalize;
pub use keys::{
    generate_key_pair, parse_private_key, parse_public_key, private_key_to_pem, public_key_to_pem, Credentials,
};
pub use signing::{sign, verify, verify_with_public_key};
pub use envelope::{decrypt, decrypt_params, encrypt, encrypt_params, SessionKey, SESSION_KEY_LEN};
pub use key_wrap::{unwrap_key, wrap_key};

pub use rsa::{RsaPrivateKey, RsaPublicKey};
