//! Response envelope shared by every gateway reply.
//!
//! Each reply carries two status layers:
//! - `return_code` - did the gateway accept the request form
//! - `result_code` - did the business operation succeed
//!
//! The second layer is only meaningful when the first is `SUCCESS`.

use serde::{Deserialize, Serialize};

use super::errors::PaymentError;

/// Status value the gateway uses for success on both layers.
pub const SUCCESS: &str = "SUCCESS";

/// Status value for failure.
pub const FAIL: &str = "FAIL";

/// Borrowed view of the two status layers of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayStatus<'a> {
    pub return_code: &'a str,
    pub return_msg: &'a str,
    pub result_code: &'a str,
    pub err_code: &'a str,
    pub err_code_des: &'a str,
}

impl GatewayStatus<'_> {
    /// Applies the two-tier check, transport layer first.
    ///
    /// # Errors
    ///
    /// - `Transport` - `return_code` is not `SUCCESS`; business fields are not
    ///   inspected
    /// - `Business` - `result_code` is not `SUCCESS`
    pub fn check(&self) -> Result<(), PaymentError> {
        if self.return_code != SUCCESS {
            return Err(PaymentError::Transport {
                return_msg: self.return_msg.to_string(),
            });
        }

        if self.result_code != SUCCESS {
            return Err(PaymentError::Business {
                err_code: self.err_code.to_string(),
                err_code_des: self.err_code_des.to_string(),
            });
        }

        Ok(())
    }
}

/// Reply of the unified-order endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnifyResponse {
    #[serde(default)]
    pub return_code: String,
    #[serde(default)]
    pub return_msg: String,
    #[serde(default)]
    pub result_code: String,
    #[serde(default)]
    pub err_code: String,
    #[serde(default)]
    pub err_code_des: String,

    #[serde(default, rename = "appid")]
    pub app_id: String,
    #[serde(default)]
    pub mch_id: String,
    #[serde(default)]
    pub nonce_str: String,
    #[serde(default)]
    pub sign: String,
    #[serde(default)]
    pub prepay_id: String,
    #[serde(default)]
    pub trade_type: String,
    #[serde(default)]
    pub code_url: String,
}

impl UnifyResponse {
    /// Deserializes a reply body.
    pub fn from_xml(raw: &[u8]) -> Result<Self, PaymentError> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| PaymentError::Deserialization(format!("body is not UTF-8: {}", e)))?;
        Ok(quick_xml::de::from_str(text)?)
    }

    pub fn status(&self) -> GatewayStatus<'_> {
        GatewayStatus {
            return_code: &self.return_code,
            return_msg: &self.return_msg,
            result_code: &self.result_code,
            err_code: &self.err_code,
            err_code_des: &self.err_code_des,
        }
    }

    /// Checks both status layers and extracts the business result.
    pub fn into_result(self) -> Result<SubmissionResult, PaymentError> {
        self.status().check()?;

        Ok(SubmissionResult {
            app_id: self.app_id,
            mch_id: self.mch_id,
            prepay_id: self.prepay_id,
            nonce_str: self.nonce_str,
            sign: self.sign,
            trade_type: self.trade_type,
            code_url: Some(self.code_url).filter(|url| !url.is_empty()),
        })
    }
}

/// Business-relevant subset of a successful unified-order reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub app_id: String,
    pub mch_id: String,
    /// Prepay session ID, valid for two hours.
    pub prepay_id: String,
    pub nonce_str: String,
    /// Signature echoed by the gateway.
    pub sign: String,
    pub trade_type: String,
    /// QR code URL, only returned for NATIVE trades.
    pub code_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS_REPLY: &str = r#"<xml>
        <return_code><![CDATA[SUCCESS]]></return_code>
        <return_msg><![CDATA[OK]]></return_msg>
        <appid><![CDATA[wx2421b1c4370ec43b]]></appid>
        <mch_id><![CDATA[10000100]]></mch_id>
        <nonce_str><![CDATA[IITRi8Iabbblz1Jc]]></nonce_str>
        <sign><![CDATA[7921E432F65EB8ED0CE9755F0E86D72F]]></sign>
        <result_code><![CDATA[SUCCESS]]></result_code>
        <prepay_id><![CDATA[wx201411101639507cbf6ffd8b0779950874]]></prepay_id>
        <trade_type><![CDATA[JSAPI]]></trade_type>
    </xml>"#;

    // ══════════════════════════════════════════════════════════════
    // Two-Tier Check Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn return_code_fail_yields_transport_error_only() {
        let raw = r#"<xml>
            <return_code>FAIL</return_code>
            <return_msg>invalid mch_id</return_msg>
            <result_code>FAIL</result_code>
            <err_code>SHOULD_NOT_SURFACE</err_code>
            <err_code_des>business detail</err_code_des>
        </xml>"#;

        let err = UnifyResponse::from_xml(raw.as_bytes())
            .unwrap()
            .into_result()
            .unwrap_err();

        match err {
            PaymentError::Transport { return_msg } => assert_eq!(return_msg, "invalid mch_id"),
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[test]
    fn result_code_fail_yields_business_error() {
        let raw = r#"<xml>
            <return_code>SUCCESS</return_code>
            <return_msg>OK</return_msg>
            <result_code>FAIL</result_code>
            <err_code>ORDERPAID</err_code>
            <err_code_des>order already paid</err_code_des>
        </xml>"#;

        let err = UnifyResponse::from_xml(raw.as_bytes())
            .unwrap()
            .into_result()
            .unwrap_err();

        match err {
            PaymentError::Business {
                err_code,
                err_code_des,
            } => {
                assert_eq!(err_code, "ORDERPAID");
                assert_eq!(err_code_des, "order already paid");
            }
            other => panic!("Expected Business error, got {:?}", other),
        }
    }

    #[test]
    fn missing_return_code_is_transport_error() {
        let status = GatewayStatus {
            return_code: "",
            return_msg: "",
            result_code: SUCCESS,
            err_code: "",
            err_code_des: "",
        };
        assert!(matches!(status.check(), Err(PaymentError::Transport { .. })));
    }

    // ══════════════════════════════════════════════════════════════
    // Extraction Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn success_reply_yields_submission_result() {
        let result = UnifyResponse::from_xml(SUCCESS_REPLY.as_bytes())
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!(result.prepay_id, "wx201411101639507cbf6ffd8b0779950874");
        assert_eq!(result.nonce_str, "IITRi8Iabbblz1Jc");
        assert_eq!(result.sign, "7921E432F65EB8ED0CE9755F0E86D72F");
        assert_eq!(result.app_id, "wx2421b1c4370ec43b");
        assert_eq!(result.trade_type, "JSAPI");
        assert_eq!(result.code_url, None);
    }

    #[test]
    fn garbage_body_is_deserialization_error() {
        let result = UnifyResponse::from_xml(b"<xml><return_code>SUCCESS</xml>");
        assert!(matches!(result, Err(PaymentError::Deserialization(_))));
    }
}
