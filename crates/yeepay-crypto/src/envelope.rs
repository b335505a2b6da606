//! AES session-key envelope.
//!
//! Request and callback bodies are AES-128-ECB encrypted with PKCS#7
//! padding under a 16-character alphanumeric session key, then base64
//! encoded. The key characters are the AES key bytes.

use std::fmt;

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use yeepay_core::ParameterSet;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

type Aes128EcbEnc = ecb::Encryptor<aes::Aes128>;
type Aes128EcbDec = ecb::Decryptor<aes::Aes128>;

/// Session key length in characters (and bytes).
pub const SESSION_KEY_LEN: usize = 16;

/// Ephemeral symmetric key. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; SESSION_KEY_LEN]);

impl SessionKey {
    /// Draw 16 characters uniformly from `[A-Za-z0-9]` with OS entropy.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SESSION_KEY_LEN];
        for (slot, c) in bytes.iter_mut().zip(OsRng.sample_iter(Alphanumeric)) {
            *slot = c;
        }
        Self(bytes)
    }

    /// Rebuild a key from its characters. Must be 16 ASCII alphanumerics.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SESSION_KEY_LEN {
            return Err(CryptoError::InvalidKeyLength {
                expected: SESSION_KEY_LEN,
                actual: bytes.len(),
            });
        }
        if !bytes.iter().all(u8::is_ascii_alphanumeric) {
            return Err(CryptoError::InvalidInput(
                "session key must be ASCII alphanumeric".into(),
            ));
        }
        let mut key = [0u8; SESSION_KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

/// Encrypt a UTF-8 string under the session key. Returns base64.
pub fn encrypt(plaintext: &str, key: &SessionKey) -> String {
    let ciphertext = Aes128EcbEnc::new(key.as_bytes().into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
    STANDARD.encode(ciphertext)
}

/// Decrypt base64 ciphertext produced by [`encrypt`].
pub fn decrypt(ciphertext: &str, key: &SessionKey) -> Result<String, CryptoError> {
    let raw = STANDARD
        .decode(ciphertext.trim())
        .map_err(|e| CryptoError::DecryptionError(format!("ciphertext is not base64: {}", e)))?;
    if raw.is_empty() {
        return Err(CryptoError::DecryptionError("ciphertext is empty".into()));
    }
    let plaintext = Aes128EcbDec::new(key.as_bytes().into())
        .decrypt_padded_vec_mut::<Pkcs7>(&raw)
        .map_err(|_| CryptoError::DecryptionError("bad padding or block length".into()))?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionError("plaintext is not UTF-8".into()))
}

/// Serialize a parameter set to JSON and encrypt it.
pub fn encrypt_params(params: &ParameterSet, key: &SessionKey) -> Result<String, CryptoError> {
    let json = serde_json::to_string(params)
        .map_err(|e| CryptoError::EncryptionError(format!("payload serialization failed: {}", e)))?;
    Ok(encrypt(&json, key))
}

/// Decrypt and parse a JSON parameter set.
pub fn decrypt_params(ciphertext: &str, key: &SessionKey) -> Result<ParameterSet, CryptoError> {
    let json = decrypt(ciphertext, key)?;
    serde_json::from_str(&json)
        .map_err(|e| CryptoError::DecryptionError(format!("payload is not a parameter object: {}", e)))
}
