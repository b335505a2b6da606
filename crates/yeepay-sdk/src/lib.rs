//! Yeepay mobile payment client.
//!
//! [`YeepayClient`] signs and encrypts payment requests into the gateway's
//! `{ merchantaccount, encryptkey, data }` envelope, assembles web-pay URLs,
//! and authenticates payment-result callbacks.

pub mod error;
pub mod query;
pub mod client;

pub use error::SdkError;
pub use query::{to_query_string, CallbackPayload};
pub use client::YeepayClient;

pub use yeepay_core::{
    ApiType, ClientConfig, KeyConfig, KeySource, ParamValue, ParameterSet, SessionKeyPolicy, SignedRequest,
    WebPayRequest,
};
