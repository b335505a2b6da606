use url::form_urlencoded;
use yeepay_core::SignedRequest;

use crate::error::SdkError;

/// Encode a signed request as `merchantaccount=…&encryptkey=…&data=…`.
///
/// Values are form-urlencoded so base64 `+`, `/` and `=` survive the trip.
pub fn to_query_string(request: &SignedRequest) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(request.query_pairs())
        .finish()
}

/// The two fields of an inbound payment-result callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackPayload {
    pub data: String,
    pub encryptkey: String,
}

impl CallbackPayload {
    /// Extract `data` and `encryptkey` from a callback query string or
    /// form body. A leading `?` is ignored.
    pub fn from_query(query: &str) -> Result<Self, SdkError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut data = None;
        let mut encryptkey = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "data" => data = Some(value.into_owned()),
                "encryptkey" => encryptkey = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(Self {
            data: data.ok_or(SdkError::MissingCallbackField("data"))?,
            encryptkey: encryptkey.ok_or(SdkError::MissingCallbackField("encryptkey"))?,
        })
    }
}

impl From<SignedRequest> for CallbackPayload {
    fn from(request: SignedRequest) -> Self {
        Self {
            data: request.data,
            encryptkey: request.encryptkey,
        }
    }
}
