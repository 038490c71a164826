//! Signed parameters for the mini-program `requestPayment` call.
//!
//! This signature domain is separate from order assembly: field names use
//! camelCase and the field set is built here, never shared with `WireOrder`.

use serde::{Deserialize, Serialize};

use super::errors::PaymentError;
use super::signer::{self, CanonicalFieldSet, SignType};

/// Longest nonce the front-end API accepts.
pub const MAX_CLIENT_NONCE_LEN: usize = 32;

/// Payload handed to the front end. Field casing is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPaymentParams {
    #[serde(rename = "timeStamp")]
    pub timestamp: String,

    #[serde(rename = "nonceStr")]
    pub nonce_str: String,

    #[serde(rename = "signType")]
    pub sign_type: SignType,

    #[serde(rename = "paySign")]
    pub pay_sign: String,

    pub package: String,
}

impl ClientPaymentParams {
    /// Builds and signs the parameters with the current Unix time.
    ///
    /// # Errors
    ///
    /// - `InvalidNonce` - `nonce` longer than 32 characters
    /// - `Signing` - digest failure
    pub fn generate(
        app_id: &str,
        key: &str,
        nonce: &str,
        prepay_id: &str,
    ) -> Result<Self, PaymentError> {
        Self::generate_at(app_id, key, nonce, prepay_id, chrono::Utc::now().timestamp())
    }

    /// Same as [`generate`](Self::generate) with an explicit timestamp.
    pub fn generate_at(
        app_id: &str,
        key: &str,
        nonce: &str,
        prepay_id: &str,
        unix_secs: i64,
    ) -> Result<Self, PaymentError> {
        if nonce.len() > MAX_CLIENT_NONCE_LEN {
            return Err(PaymentError::InvalidNonce { len: nonce.len() });
        }

        let sign_type = SignType::Md5;
        let timestamp = unix_secs.to_string();
        let package = format!("prepay_id={}", prepay_id);

        let fields = CanonicalFieldSet::new()
            .with("appId", app_id)
            .with("signType", sign_type.as_str())
            .with("nonceStr", nonce)
            .with("package", package.as_str())
            .with("timeStamp", timestamp.as_str());
        let pay_sign = signer::sign(&fields, key, sign_type)?;

        Ok(Self {
            timestamp,
            nonce_str: nonce.to_string(),
            sign_type,
            pay_sign,
            package,
        })
    }

    pub fn to_json(&self) -> Result<String, PaymentError> {
        serde_json::to_string(self).map_err(|e| PaymentError::Serialization(e.to_string()))
    }
}
