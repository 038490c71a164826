//! Canonical request signing for the gateway's XML protocol.
//!
//! Every outbound request and every inbound response or callback is signed the
//! same way:
//!
//! 1. Sort field names by ASCII byte order
//! 2. Join non-empty fields as `name=value` with `&`
//! 3. Append `&key=<merchant key>`
//! 4. Digest with MD5 or HMAC-SHA256 (keyed with the merchant key)
//! 5. Render the digest as uppercase hex
//!
//! Verification recomputes the digest and compares in constant time.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// Digest algorithm carried in the `sign_type` / `signType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignType {
    #[default]
    Md5,
    HmacSha256,
}

impl SignType {
    /// Wire identifier of the algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::Md5 => "MD5",
            SignType::HmacSha256 => "HMAC-SHA256",
        }
    }

    /// Resolves the algorithm declared by a message; absent means MD5.
    pub fn from_declared(declared: &str) -> Result<Self, PaymentError> {
        if declared.is_empty() {
            return Ok(SignType::Md5);
        }
        declared.parse()
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MD5" => Ok(SignType::Md5),
            "HMAC-SHA256" => Ok(SignType::HmacSha256),
            other => Err(PaymentError::Signing(format!(
                "unsupported sign type: {}",
                other
            ))),
        }
    }
}

impl Serialize for SignType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SignType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SignType::from_declared(&raw).map_err(serde::de::Error::custom)
    }
}

/// The exact name → value mapping a signature is computed over.
///
/// Empty values are never stored: a field the gateway does not receive must
/// not take part in the signature either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalFieldSet {
    fields: BTreeMap<String, String>,
}

impl CanonicalFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field unless its value is empty.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if !value.is_empty() {
            self.fields.insert(name.into(), value);
        }
        self
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in signing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The string that gets digested, including the trailing key.
    pub(crate) fn canonical_string(&self, key: &str) -> String {
        let mut out = String::new();
        for (name, value) in &self.fields {
            out.push_str(name);
            out.push('=');
            out.push_str(value);
            out.push('&');
        }
        out.push_str("key=");
        out.push_str(key);
        out
    }
}

impl<K, V> FromIterator<(K, V)> for CanonicalFieldSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = CanonicalFieldSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Merchant API key together with the algorithm it signs with.
///
/// The secret is only exposed at the digest call; `Debug` output is redacted.
#[derive(Debug, Clone)]
pub struct MerchantKey {
    secret: SecretString,
    sign_type: SignType,
}

impl MerchantKey {
    pub fn new(secret: impl Into<String>, sign_type: SignType) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            sign_type,
        }
    }

    pub fn sign_type(&self) -> SignType {
        self.sign_type
    }

    /// Raw key, for call sites that must feed it to [`sign`] themselves.
    pub fn expose(&self) -> &str {
        self.secret.expose_secret()
    }

    /// Signs with this key's algorithm.
    pub fn sign(&self, fields: &CanonicalFieldSet) -> Result<String, PaymentError> {
        sign(fields, self.expose(), self.sign_type)
    }
}

/// Signs a field set with the merchant key.
///
/// # Errors
///
/// Returns `PaymentError::Signing` if the digest primitive rejects the key.
pub fn sign(
    fields: &CanonicalFieldSet,
    key: &str,
    sign_type: SignType,
) -> Result<String, PaymentError> {
    let payload = fields.canonical_string(key);

    match sign_type {
        SignType::Md5 => Ok(hex::encode_upper(md5::compute(payload.as_bytes()).0)),
        SignType::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(key.as_bytes())
                .map_err(|e| PaymentError::Signing(e.to_string()))?;
            mac.update(payload.as_bytes());
            Ok(hex::encode_upper(mac.finalize().into_bytes()))
        }
    }
}

/// Checks a signature received from the gateway against the field set.
///
/// Hex case is ignored; the comparison itself is constant-time.
///
/// # Errors
///
/// - `InvalidSignature` - the recomputed digest differs
/// - `Signing` - the digest could not be computed
pub fn verify(
    fields: &CanonicalFieldSet,
    key: &str,
    sign_type: SignType,
    signature: &str,
) -> Result<(), PaymentError> {
    let expected = sign(fields, key, sign_type)?;
    let provided = signature.to_ascii_uppercase();

    if !constant_time_compare(expected.as_bytes(), provided.as_bytes()) {
        return Err(PaymentError::InvalidSignature);
    }
    Ok(())
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
