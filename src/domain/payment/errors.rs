//! Error types for gateway signing, submission and notification handling.
//!
//! Every failure is returned to the immediate caller. Nothing here logs; the
//! adapters decide what is worth a `tracing` event.

use thiserror::Error;

/// Errors produced by the payment gateway adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The digest primitive rejected its input.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Outbound client IP could not be resolved.
    #[error("Client IP resolution failed: {0}")]
    IpResolution(String),

    /// Nonce handed to the client-parameter generator exceeds 32 characters.
    #[error("Nonce must be at most 32 characters, got {len}")]
    InvalidNonce { len: usize },

    /// Gateway rejected the request form (`return_code != SUCCESS`).
    #[error("Gateway rejected request: {return_msg}")]
    Transport { return_msg: String },

    /// Gateway accepted the request but the business operation failed
    /// (`result_code != SUCCESS`).
    #[error("Gateway business error {err_code}: {err_code_des}")]
    Business {
        err_code: String,
        err_code_des: String,
    },

    /// Callback body is missing expected fields or carries corrupt values.
    #[error("Malformed notification: {0}")]
    MalformedNotification(String),

    /// XML body could not be deserialized into the expected envelope.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Outbound value could not be rendered as XML or JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP exchange with the gateway failed (connect, timeout, status).
    #[error("HTTP error: {0}")]
    Http(String),

    /// A signature carried by the gateway did not match the recomputed one.
    #[error("Invalid signature")]
    InvalidSignature,
}

impl PaymentError {
    /// Returns true if re-running the whole operation may succeed.
    ///
    /// Assembly is always re-run from scratch, so a retry never reuses a
    /// partially built order.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::IpResolution(_) | PaymentError::Http(_))
    }
}

impl From<quick_xml::DeError> for PaymentError {
    fn from(err: quick_xml::DeError) -> Self {
        PaymentError::Deserialization(err.to_string())
    }
}
