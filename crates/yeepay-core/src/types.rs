use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Name of the field carrying the request signature.
pub const SIGN_FIELD: &str = "sign";

/// Fields accepted by the mobile web-pay endpoint (`pay/request`).
///
/// Anything outside this list is dropped before signing.
pub const WEB_PAY_FIELDS: &[&str] = &[
    "merchantaccount",
    "orderid",
    "transtime",
    "currency",
    "amount",
    "productcatalog",
    "productname",
    "productdesc",
    "identityid",
    "identitytype",
    "terminaltype",
    "terminalid",
    "userip",
    "userua",
    "callbackurl",
    "fcallbackurl",
    "version",
    "paytypes",
    "cardno",
    "bank",
    "orderexpdate",
];

/// A single parameter value.
///
/// Integers that fit an `i64` are kept as such. Any other JSON number
/// (decimals, exponents, integers beyond `i64`) keeps its exact source text,
/// which is what the signer saw and what canonicalization must reproduce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Number(serde_json::Number),
    Text(String),
}

impl ParamValue {
    /// Truthiness as the gateway's reference client judges it: empty text and
    /// zero are "missing".
    pub fn is_truthy(&self) -> bool {
        match self {
            ParamValue::Integer(n) => *n != 0,
            ParamValue::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
            ParamValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(ParamValue::Text(s)),
            serde_json::Value::Number(n) => Ok(ParamValue::from(n)),
            other => Err(de::Error::custom(format!(
                "parameter values must be strings or numbers, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(n) => write!(f, "{}", n),
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<serde_json::Number> for ParamValue {
    fn from(n: serde_json::Number) -> Self {
        // "-0" or "1e2" must not collapse to a differently spelled integer.
        match n.as_i64() {
            Some(i) if i.to_string() == n.to_string() => ParamValue::Integer(i),
            _ => ParamValue::Number(n),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Integer(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Integer(n.into())
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Integer(n.into())
    }
}

/// A payment request or callback payload: field name to value.
///
/// Backed by a `BTreeMap`, so iteration is always in ascending key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, ParamValue>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copy of this set with the `sign` field stripped.
    pub fn without_sign(&self) -> Self {
        let mut copy = self.clone();
        copy.0.remove(SIGN_FIELD);
        copy
    }

    /// Detach the embedded signature, if present.
    pub fn take_sign(&mut self) -> Option<ParamValue> {
        self.0.remove(SIGN_FIELD)
    }

    /// Overlay `other` onto this set; fields in `other` win.
    pub fn merge(&mut self, other: ParameterSet) {
        self.0.extend(other.0);
    }

    /// Keep only the listed fields.
    pub fn retain_fields(&mut self, fields: &[&str]) {
        self.0.retain(|k, _| fields.contains(&k.as_str()));
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, ParamValue);
    type IntoIter = btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The wire-level request handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRequest {
    /// Merchant account identifier.
    pub merchantaccount: String,
    /// Session key wrapped with the gateway public key (base64).
    pub encryptkey: String,
    /// Signed parameter set encrypted with the session key (base64).
    pub data: String,
}

impl SignedRequest {
    /// Field name/value pairs in wire order.
    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("merchantaccount", &self.merchantaccount),
            ("encryptkey", &self.encryptkey),
            ("data", &self.data),
        ]
    }
}

/// Gateway API families, each with its own base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiType {
    Merchant,
    Mobile,
    Pc,
    Pay,
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiType::Merchant => write!(f, "merchant"),
            ApiType::Mobile => write!(f, "mobile"),
            ApiType::Pc => write!(f, "pc"),
            ApiType::Pay => write!(f, "pay"),
        }
    }
}

/// A mobile web-pay request.
///
/// Unset fields are filled from the merchant defaults in the client
/// configuration. `orderid`, `transtime`, `amount`, `identityid`, `userip`
/// and `userua` must be set for the request to pass the validation gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebPayRequest {
    pub merchantaccount: Option<String>,
    pub orderid: Option<String>,
    /// Transaction time, Unix seconds.
    pub transtime: Option<i64>,
    /// ISO 4217 numeric code; 156 is CNY.
    pub currency: Option<i64>,
    /// Amount in fen.
    pub amount: Option<i64>,
    pub productcatalog: Option<String>,
    pub productname: Option<String>,
    pub productdesc: Option<String>,
    pub identityid: Option<String>,
    pub identitytype: Option<i64>,
    pub terminaltype: Option<i64>,
    pub terminalid: Option<String>,
    pub userip: Option<String>,
    pub userua: Option<String>,
    pub callbackurl: Option<String>,
    pub fcallbackurl: Option<String>,
    pub version: Option<i64>,
    pub paytypes: Option<String>,
    pub cardno: Option<String>,
    pub bank: Option<String>,
    pub orderexpdate: Option<i64>,
}

impl WebPayRequest {
    /// A request carrying just the required fields.
    pub fn new(
        orderid: impl Into<String>,
        transtime: i64,
        amount: i64,
        identityid: impl Into<String>,
        userip: impl Into<String>,
        userua: impl Into<String>,
    ) -> Self {
        Self {
            orderid: Some(orderid.into()),
            transtime: Some(transtime),
            amount: Some(amount),
            identityid: Some(identityid.into()),
            userip: Some(userip.into()),
            userua: Some(userua.into()),
            ..Default::default()
        }
    }

    /// The set fields as a parameter set, in `WEB_PAY_FIELDS` terms.
    pub fn to_params(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        let text_fields = [
            ("merchantaccount", &self.merchantaccount),
            ("orderid", &self.orderid),
            ("productcatalog", &self.productcatalog),
            ("productname", &self.productname),
            ("productdesc", &self.productdesc),
            ("identityid", &self.identityid),
            ("terminalid", &self.terminalid),
            ("userip", &self.userip),
            ("userua", &self.userua),
            ("callbackurl", &self.callbackurl),
            ("fcallbackurl", &self.fcallbackurl),
            ("paytypes", &self.paytypes),
            ("cardno", &self.cardno),
            ("bank", &self.bank),
        ];
        for (name, value) in text_fields {
            if let Some(v) = value {
                params.insert(name, v.as_str());
            }
        }
        let int_fields = [
            ("transtime", self.transtime),
            ("currency", self.currency),
            ("amount", self.amount),
            ("identitytype", self.identitytype),
            ("terminaltype", self.terminaltype),
            ("version", self.version),
            ("orderexpdate", self.orderexpdate),
        ];
        for (name, value) in int_fields {
            if let Some(v) = value {
                params.insert(name, v);
            }
        }
        params
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
