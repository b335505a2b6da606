//! Request signatures.
//!
//! The gateway does not use a standard RSA signature scheme. A "signature"
//! is the SHA-256 digest of the canonical value string run through the RSA
//! private-key operation with PKCS#1 v1.5 type-1 padding and no DigestInfo
//! prefix. Anyone holding the public key can recover the digest from it.
//! The output is deterministic, which is what lets the gateway check a
//! signature by recomputing it and comparing strings.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use yeepay_core::ParameterSet;

use crate::canonical::canonicalize;
use crate::error::CryptoError;

/// SHA-256 of the canonical value string.
pub fn signing_digest(params: &ParameterSet) -> [u8; 32] {
    Sha256::digest(canonicalize(params).as_bytes()).into()
}

/// Sign a parameter set with a private key. Any `sign` field is ignored.
pub fn sign(params: &ParameterSet, private_key: &RsaPrivateKey) -> Result<String, CryptoError> {
    let digest = signing_digest(params);
    let raw = private_key
        .sign(Pkcs1v15Sign::new_unprefixed(), &digest)
        .map_err(|e| CryptoError::SigningError(e.to_string()))?;
    Ok(STANDARD.encode(raw))
}

/// Check `claimed` by re-signing with the same private key.
///
/// Exact string comparison: whitespace or alternative encodings of the
/// same bytes do not match.
pub fn verify(params: &ParameterSet, claimed: &str, private_key: &RsaPrivateKey) -> Result<bool, CryptoError> {
    let expected = sign(&params.without_sign(), private_key)?;
    Ok(expected == claimed)
}

/// Check `claimed` against the signer's public key by recovering the digest.
///
/// Equivalent to re-signing with the signer's private key and comparing.
/// Claimed values that are not canonical padded base64 never match.
pub fn verify_with_public_key(params: &ParameterSet, claimed: &str, public_key: &RsaPublicKey) -> bool {
    let Ok(raw) = STANDARD.decode(claimed) else {
        return false;
    };
    // Reject encodings that decode but would not be produced by `sign`.
    if STANDARD.encode(&raw) != claimed {
        return false;
    }
    let digest = signing_digest(params);
    public_key
        .verify(Pkcs1v15Sign::new_unprefixed(), &digest, &raw)
        .is_ok()
}
