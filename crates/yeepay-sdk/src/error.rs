use yeepay_core::CoreError;
use yeepay_crypto::CryptoError;

/// Client-level errors.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("callback signature does not match its payload")]
    SignatureMismatch,

    #[error("callback is missing field: {0}")]
    MissingCallbackField(&'static str),
}
