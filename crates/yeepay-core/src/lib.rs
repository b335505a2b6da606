//! Yeepay SDK core.
//!
//! Parameter sets, the wire-level signed request, the web-pay request
//! field list, the pre-request validation gate, and the immutable client
//! configuration.

pub mod error;
pub mod types;
pub mod validation;
pub mod config;

pub use error::CoreError;
pub use types::{ApiType, ParamValue, ParameterSet, SignedRequest, WebPayRequest, SIGN_FIELD, WEB_PAY_FIELDS};
pub use validation::{check_required, REQUIRED_FIELDS};
pub use config::{ApiEndpoints, ClientConfig, KeyConfig, KeySource, MerchantDefaults, SessionKeyPolicy};
