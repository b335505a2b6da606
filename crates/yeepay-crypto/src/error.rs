/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key import failed: {0}")]
    KeyImportError(String),

    #[error("key generation failed: {0}")]
    KeyGenerationError(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("signing failed: {0}")]
    SigningError(String),

    #[error("payload carries no signature")]
    MissingSignature,

    #[error("encryption failed: {0}")]
    EncryptionError(String),

    #[error("decryption failed: {0}")]
    DecryptionError(String),

    #[error("session key wrapping failed: {0}")]
    KeyWrapError(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
