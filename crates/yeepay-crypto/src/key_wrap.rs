use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::envelope::SessionKey;
use crate::error::CryptoError;

/// Encrypt the session key for the holder of `recipient`'s private key.
///
/// RSA with PKCS#1 v1.5 encryption padding, base64 output. Padding is
/// random, so wrapping the same key twice gives different strings.
pub fn wrap_key(key: &SessionKey, recipient: &RsaPublicKey) -> Result<String, CryptoError> {
    let wrapped = recipient
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, key.as_bytes())
        .map_err(|e| CryptoError::KeyWrapError(format!("RSA encryption failed: {}", e)))?;
    Ok(STANDARD.encode(wrapped))
}

/// Recover a session key wrapped for this party's public key.
///
/// PKCS#1 v1.5 decryption in `rsa` 0.9 is not constant-time
/// (RUSTSEC-2023-0071). Blinding is applied, but callers handling untrusted
/// input should not expose timing or distinct failure modes.
pub fn unwrap_key(wrapped: &str, own_private_key: &RsaPrivateKey) -> Result<SessionKey, CryptoError> {
    let raw = STANDARD
        .decode(wrapped.trim())
        .map_err(|e| CryptoError::KeyWrapError(format!("wrapped key is not base64: {}", e)))?;
    let key_bytes = Zeroizing::new(
        own_private_key
            .decrypt_blinded(&mut OsRng, Pkcs1v15Encrypt, &raw)
            .map_err(|e| CryptoError::KeyWrapError(format!("RSA decryption failed: {}", e)))?,
    );
    SessionKey::from_bytes(&key_bytes)
        .map_err(|e| CryptoError::KeyWrapError(format!("unwrapped data is not a session key: {}", e)))
}
