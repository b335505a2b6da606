use std::borrow::Cow;
use std::sync::OnceLock;

use url::Url;
use yeepay_core::{
    check_required, ApiType, ClientConfig, ParameterSet, SessionKeyPolicy, SignedRequest, WebPayRequest, SIGN_FIELD,
    WEB_PAY_FIELDS,
};
use yeepay_crypto::{
    decrypt_params, encrypt_params, signing, unwrap_key, verify_with_public_key, wrap_key, Credentials, CryptoError,
    SessionKey,
};

use crate::error::SdkError;
use crate::query::{to_query_string, CallbackPayload};

/// Method path of the mobile web-pay endpoint.
pub const WEB_PAY_METHOD: &str = "pay/request";

/// Yeepay client for one merchant.
///
/// Configuration and keys are fixed at construction. With
/// [`SessionKeyPolicy::PerClient`] the session key is generated on first use
/// and shared by every later request; the first-use initialization is
/// atomic, so a client can be shared across threads.
pub struct YeepayClient {
    config: ClientConfig,
    credentials: Credentials,
    session_key: OnceLock<SessionKey>,
}

impl YeepayClient {
    /// Validate the config and import its keys.
    pub fn new(config: ClientConfig) -> Result<Self, SdkError> {
        config.validate()?;
        let private_key = config.keys.merchant_private_key.load()?;
        let own_public_key = config
            .keys
            .merchant_public_key
            .as_ref()
            .map(|source| source.load())
            .transpose()?;
        let yeepay_public_key = config.keys.yeepay_public_key.load()?;

        let credentials = Credentials::from_pem(
            config.merchant_account.clone(),
            &private_key,
            own_public_key.as_deref(),
            &yeepay_public_key,
        )?;

        tracing::info!(
            merchant = %config.merchant_account,
            policy = ?config.session_key_policy,
            "Yeepay client initialized"
        );

        Ok(Self {
            config,
            credentials,
            session_key: OnceLock::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sign a parameter set with the merchant private key.
    pub fn sign(&self, params: &ParameterSet) -> Result<String, SdkError> {
        Ok(signing::sign(params, self.credentials.private_key())?)
    }

    /// Check a signature produced with the merchant private key.
    pub fn verify(&self, params: &ParameterSet, claimed: &str) -> Result<bool, SdkError> {
        Ok(signing::verify(params, claimed, self.credentials.private_key())?)
    }

    /// The session key for the next encryption, per the configured policy.
    fn session_key(&self) -> Cow<'_, SessionKey> {
        match self.config.session_key_policy {
            SessionKeyPolicy::PerClient => Cow::Borrowed(self.session_key.get_or_init(|| {
                tracing::debug!(merchant = %self.config.merchant_account, "session key generated");
                SessionKey::generate()
            })),
            SessionKeyPolicy::PerRequest => Cow::Owned(SessionKey::generate()),
        }
    }

    /// Sign, wrap and encrypt a parameter set into the wire envelope.
    ///
    /// Any `sign` already in `params` is replaced.
    pub fn build_request(&self, params: &ParameterSet) -> Result<SignedRequest, SdkError> {
        let mut signed = params.without_sign();
        let signature = self.sign(&signed)?;
        signed.insert(SIGN_FIELD, signature);

        let key = self.session_key();
        let encryptkey = wrap_key(&key, self.credentials.counterparty_public_key())?;
        let data = encrypt_params(&signed, &key)?;

        tracing::debug!(
            merchant = %self.config.merchant_account,
            fields = signed.len(),
            "payment request built"
        );

        Ok(SignedRequest {
            merchantaccount: self.config.merchant_account.clone(),
            encryptkey,
            data,
        })
    }

    /// Run the validation gate, then build the request.
    ///
    /// Returns `Ok(None)` without signing anything when a required field is
    /// missing.
    pub fn build_payment_request(&self, params: &ParameterSet) -> Result<Option<SignedRequest>, SdkError> {
        if let Err(e) = check_required(params) {
            tracing::debug!(error = %e, "payment request rejected by validation gate");
            return Ok(None);
        }
        self.build_request(params).map(Some)
    }

    /// Full URL of `method` under the given API family.
    pub fn api_url(&self, api: ApiType, method: &str) -> Result<Url, SdkError> {
        Ok(self.config.endpoints.url_for(api, method)?)
    }

    /// Build a request and render it as a GET URL on `method`.
    pub fn request_url(&self, api: ApiType, method: &str, params: &ParameterSet) -> Result<String, SdkError> {
        let request = self.build_request(params)?;
        let mut url = self.api_url(api, method)?;
        url.set_query(Some(&to_query_string(&request)));
        Ok(url.into())
    }

    /// Merge merchant defaults under `params` and keep the web-pay fields.
    ///
    /// `None` when `params` is empty or fails the validation gate.
    pub fn web_pay_params(&self, params: &ParameterSet) -> Option<ParameterSet> {
        if params.is_empty() {
            return None;
        }
        if let Err(e) = check_required(params) {
            tracing::debug!(error = %e, "web-pay request rejected by validation gate");
            return None;
        }
        let mut merged = self.config.defaults.to_params(&self.config.merchant_account);
        merged.merge(params.clone());
        merged.retain_fields(WEB_PAY_FIELDS);
        Some(merged)
    }

    /// Mobile web-pay redirect URL for an untyped parameter set.
    ///
    /// `Ok(None)` when the request is empty or incomplete.
    pub fn web_pay_from_params(&self, params: &ParameterSet) -> Result<Option<String>, SdkError> {
        match self.web_pay_params(params) {
            Some(query) => self.request_url(ApiType::Mobile, WEB_PAY_METHOD, &query).map(Some),
            None => Ok(None),
        }
    }

    /// Mobile web-pay redirect URL.
    ///
    /// `Ok(None)` when the request is empty or incomplete. Errors only on
    /// key or cipher failures.
    pub fn web_pay(&self, request: &WebPayRequest) -> Result<Option<String>, SdkError> {
        if request.is_empty() {
            return Ok(None);
        }
        self.web_pay_from_params(&request.to_params())
    }

    /// Decrypt and authenticate a callback, returning its fields without
    /// `sign`.
    ///
    /// The session key is unwrapped with the merchant private key; the
    /// signature is checked against the gateway public key.
    pub fn open_callback(&self, data: &str, encryptkey: &str) -> Result<ParameterSet, SdkError> {
        let key = unwrap_key(encryptkey, self.credentials.private_key())?;
        let mut params = decrypt_params(data, &key)?;
        let claimed = params.take_sign().ok_or(CryptoError::MissingSignature)?;
        let claimed = claimed.as_str().ok_or(SdkError::SignatureMismatch)?;

        if !verify_with_public_key(&params, claimed, self.credentials.counterparty_public_key()) {
            return Err(SdkError::SignatureMismatch);
        }
        Ok(params)
    }

    /// `true` only when the callback decrypts and its signature matches.
    /// Failures are logged, never returned.
    ///
    /// `encryptkey` is attacker-controlled and is unwrapped with RSA PKCS#1
    /// v1.5 decryption, which the gateway's format mandates. The `rsa` crate's
    /// implementation is not constant-time (RUSTSEC-2023-0071, Marvin), so
    /// an endpoint that exposes verification timing to the network can leak
    /// information about the merchant private key. Rate-limit callback
    /// endpoints and avoid returning distinguishable errors.
    pub fn verify_callback(&self, data: &str, encryptkey: &str) -> bool {
        match self.open_callback(data, encryptkey) {
            Ok(params) => {
                tracing::info!(
                    orderid = %params.get("orderid").map(|v| v.to_string()).unwrap_or_default(),
                    "callback verified"
                );
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "callback verification failed");
                false
            }
        }
    }

    /// [`verify_callback`](Self::verify_callback) on a raw query string.
    pub fn verify_callback_query(&self, query: &str) -> bool {
        match CallbackPayload::from_query(query) {
            Ok(payload) => self.verify_callback(&payload.data, &payload.encryptkey),
            Err(e) => {
                tracing::warn!(error = %e, "callback verification failed");
                false
            }
        }
    }
}
