//! Client configuration.
//!
//! A [`ClientConfig`] is built once per client and never mutated afterwards.
//! It can be assembled in code or loaded from a TOML file:
//!
//! ```toml
//! merchant_account = "10000418926"
//! session_key_policy = "per_client"
//!
//! [keys]
//! merchant_private_key = { path = "keys/merchant_private.pem" }
//! yeepay_public_key = { path = "keys/yeepay_public.pem" }
//!
//! [defaults]
//! currency = 156
//! callbackurl = "https://shop.example.com/yeepay/callback"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::CoreError;
use crate::types::{ApiType, ParameterSet};

/// Full configuration for a Yeepay client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Merchant account identifier issued by Yeepay.
    pub merchant_account: String,

    /// Session key lifetime.
    #[serde(default)]
    pub session_key_policy: SessionKeyPolicy,

    /// RSA key material.
    pub keys: KeyConfig,

    /// Default request fields merged under every web-pay request.
    #[serde(default)]
    pub defaults: MerchantDefaults,

    /// Gateway base URLs.
    #[serde(default)]
    pub endpoints: ApiEndpoints,
}

/// How long a session key lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKeyPolicy {
    /// Generated on first use and reused for the lifetime of the client.
    #[default]
    PerClient,
    /// A fresh key for every request.
    PerRequest,
}

/// Where the RSA keys come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Merchant private key (PKCS#1 or PKCS#8).
    pub merchant_private_key: KeySource,
    /// Merchant public key. Derived from the private key when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_public_key: Option<KeySource>,
    /// Yeepay's public key, used to wrap session keys and check callbacks.
    pub yeepay_public_key: KeySource,
}

impl KeyConfig {
    /// Resolve relative file paths against `base`.
    fn rebase(&mut self, base: &Path) {
        self.merchant_private_key.rebase(base);
        if let Some(key) = self.merchant_public_key.as_mut() {
            key.rebase(base);
        }
        self.yeepay_public_key.rebase(base);
    }
}

/// A key given inline (PEM or bare base64 DER) or as a file path.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySource {
    File { path: PathBuf },
    Inline(String),
}

impl KeySource {
    /// Read the key text.
    pub fn load(&self) -> Result<String, CoreError> {
        match self {
            KeySource::Inline(text) => Ok(text.clone()),
            KeySource::File { path } => std::fs::read_to_string(path).map_err(|source| CoreError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    fn rebase(&mut self, base: &Path) {
        if let KeySource::File { path } = self {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::File { path } => f.debug_struct("File").field("path", path).finish(),
            KeySource::Inline(_) => f.write_str("Inline(<redacted>)"),
        }
    }
}

/// Merchant-wide request defaults. Unset text fields are left out of requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantDefaults {
    #[serde(default = "default_currency", skip_serializing_if = "Option::is_none")]
    pub currency: Option<i64>,
    #[serde(default = "default_productcatalog", skip_serializing_if = "Option::is_none")]
    pub productcatalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productdesc: Option<String>,
    #[serde(default = "default_identitytype", skip_serializing_if = "Option::is_none")]
    pub identitytype: Option<i64>,
    #[serde(default = "default_terminaltype", skip_serializing_if = "Option::is_none")]
    pub terminaltype: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminalid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callbackurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcallbackurl: Option<String>,
}

impl MerchantDefaults {
    /// Defaults as a parameter set, including the merchant account.
    pub fn to_params(&self, merchant_account: &str) -> ParameterSet {
        let mut params = ParameterSet::new().with("merchantaccount", merchant_account);
        let text_fields = [
            ("productcatalog", &self.productcatalog),
            ("productname", &self.productname),
            ("productdesc", &self.productdesc),
            ("terminalid", &self.terminalid),
            ("callbackurl", &self.callbackurl),
            ("fcallbackurl", &self.fcallbackurl),
        ];
        for (name, value) in text_fields {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                params.insert(name, v);
            }
        }
        let int_fields = [
            ("currency", self.currency),
            ("identitytype", self.identitytype),
            ("terminaltype", self.terminaltype),
        ];
        for (name, value) in int_fields {
            if let Some(v) = value {
                params.insert(name, v);
            }
        }
        params
    }
}

/// Base URLs for each API family. Each must end with `/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEndpoints {
    #[serde(default = "default_merchant_url")]
    pub merchant: String,
    #[serde(default = "default_mobile_url")]
    pub mobile: String,
    #[serde(default = "default_pc_url")]
    pub pc: String,
    #[serde(default = "default_pay_url")]
    pub pay: String,
}

impl ApiEndpoints {
    pub fn base_url(&self, api: ApiType) -> &str {
        match api {
            ApiType::Merchant => &self.merchant,
            ApiType::Mobile => &self.mobile,
            ApiType::Pc => &self.pc,
            ApiType::Pay => &self.pay,
        }
    }

    /// Full URL of `method` under the given API family.
    pub fn url_for(&self, api: ApiType, method: &str) -> Result<Url, CoreError> {
        let url = Url::parse(&format!("{}{}", self.base_url(api), method))?;
        Ok(url)
    }
}

// Default value functions
fn default_currency() -> Option<i64> {
    Some(156)
}
fn default_productcatalog() -> Option<String> {
    Some("1".into())
}
fn default_identitytype() -> Option<i64> {
    Some(2)
}
fn default_terminaltype() -> Option<i64> {
    Some(3)
}
fn default_merchant_url() -> String {
    "https://ok.yeepay.com/merchant/".into()
}
fn default_mobile_url() -> String {
    "https://ok.yeepay.com/paymobile/".into()
}
fn default_pc_url() -> String {
    "https://ok.yeepay.com/payweb/".into()
}
fn default_pay_url() -> String {
    "https://ok.yeepay.com/payapi/".into()
}

impl Default for MerchantDefaults {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            productcatalog: default_productcatalog(),
            productname: None,
            productdesc: None,
            identitytype: default_identitytype(),
            terminaltype: default_terminaltype(),
            terminalid: None,
            callbackurl: None,
            fcallbackurl: None,
        }
    }
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            merchant: default_merchant_url(),
            mobile: default_mobile_url(),
            pc: default_pc_url(),
            pay: default_pay_url(),
        }
    }
}

impl ClientConfig {
    /// Config with default merchant fields and endpoints.
    pub fn new(merchant_account: impl Into<String>, keys: KeyConfig) -> Self {
        Self {
            merchant_account: merchant_account.into(),
            session_key_policy: SessionKeyPolicy::default(),
            keys,
            defaults: MerchantDefaults::default(),
            endpoints: ApiEndpoints::default(),
        }
    }

    /// Parse a TOML document. Relative key paths stay as written.
    pub fn from_toml_str(contents: &str) -> Result<Self, CoreError> {
        let config: ClientConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file. Relative key paths are resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(dir) = path.parent() {
            config.keys.rebase(dir);
        }
        tracing::debug!(path = %path.display(), merchant = %config.merchant_account, "client config loaded");
        Ok(config)
    }

    /// Save the config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CoreError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        std::fs::write(path, contents).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.merchant_account.trim().is_empty() {
            return Err(CoreError::Config("merchant_account must not be empty".into()));
        }
        for api in [ApiType::Merchant, ApiType::Mobile, ApiType::Pc, ApiType::Pay] {
            let base = self.endpoints.base_url(api);
            Url::parse(base)?;
            if !base.ends_with('/') {
                return Err(CoreError::Config(format!("{} endpoint must end with '/': {}", api, base)));
            }
        }
        Ok(())
    }
}
