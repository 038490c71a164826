//! Acknowledgement returned to the gateway after a notification.

use serde::{Deserialize, Serialize};

use super::envelope::{FAIL, SUCCESS};
use super::errors::PaymentError;

/// Minimal `<xml>` reply. The gateway keeps redelivering a notification until
/// it receives `return_code = SUCCESS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckReply {
    #[serde(rename = "return_code")]
    pub code: String,
    #[serde(rename = "return_msg", default)]
    pub msg: String,
}

impl AckReply {
    /// Encodes a caller decision. `code` is exactly `SUCCESS` or `FAIL`.
    pub fn new(accepted: bool, reason: impl Into<String>) -> Self {
        let code = if accepted { SUCCESS } else { FAIL };
        Self {
            code: code.to_string(),
            msg: reason.into(),
        }
    }

    pub fn success() -> Self {
        Self::new(true, "")
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self::new(false, reason)
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS
    }

    pub fn to_xml(&self) -> Result<String, PaymentError> {
        quick_xml::se::to_string_with_root("xml", self)
            .map_err(|e| PaymentError::Serialization(e.to_string()))
    }
}
