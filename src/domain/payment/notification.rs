//! Payment-result notification (the gateway's asynchronous callback).
//!
//! Parsing runs in two explicit passes:
//! 1. Structural deserialization of the fixed envelope into `PaidNotification`
//! 2. When `coupon_count > 0`, a generic field walk over the same body to pull
//!    the indexed `coupon_id_<i>` / `coupon_fee_<i>` pairs
//!
//! Status is checked after both passes. The notification's own `sign` is NOT
//! checked here; see [`XmlFields::verify_signature`].

use serde::{Deserialize, Serialize};

use super::envelope::GatewayStatus;
use super::errors::PaymentError;
use super::reply::AckReply;
use super::xml_fields::XmlFields;

/// One coupon applied to a payment, in gateway index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponLineItem {
    /// Coupon or instant-discount ID.
    pub coupon_id: String,

    /// Amount covered by this coupon, in minor units.
    pub coupon_fee: i64,

    /// `CASH` or `NO_CASH`; only sent for merchants with no-top-up coupons.
    pub coupon_type: Option<String>,
}

/// Deserialized payment-result callback.
///
/// All amounts are integer minor units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidNotification {
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
    pub device_info: Option<String>,
    #[serde(default)]
    pub nonce_str: String,
    #[serde(default)]
    pub sign: String,
    #[serde(default)]
    pub sign_type: Option<String>,
    #[serde(default, rename = "openid")]
    pub open_id: String,
    #[serde(default)]
    pub is_subscribe: String,
    #[serde(default)]
    pub trade_type: String,
    #[serde(default)]
    pub bank_type: String,
    #[serde(default)]
    pub total_fee: i64,
    /// Order total minus non-cash coupons.
    #[serde(default)]
    pub settlement_total_fee: Option<i64>,
    #[serde(default)]
    pub fee_type: Option<String>,
    #[serde(default)]
    pub cash_fee: i64,
    #[serde(default)]
    pub cash_fee_type: Option<String>,
    /// Sum of all coupon amounts.
    #[serde(default)]
    pub coupon_fee: Option<i64>,
    #[serde(default)]
    pub coupon_count: u32,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub out_trade_no: String,
    #[serde(default)]
    pub attach: Option<String>,
    /// Payment completion time, `yyyyMMddHHmmss`.
    #[serde(default)]
    pub time_end: String,

    /// Indexed coupons, filled by the second parsing pass.
    #[serde(skip_deserializing, default)]
    pub coupons: Vec<CouponLineItem>,
}

impl PaidNotification {
    /// Parses a callback body (both passes).
    ///
    /// # Errors
    ///
    /// - `Deserialization` - the fixed envelope does not deserialize
    /// - `MalformedNotification` - an indexed coupon field is missing or its
    ///   fee is not an integer
    pub fn from_xml(raw: &[u8]) -> Result<Self, PaymentError> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| PaymentError::Deserialization(format!("body is not UTF-8: {}", e)))?;
        let mut notification: PaidNotification = quick_xml::de::from_str(text)?;

        if notification.coupon_count > 0 {
            let fields = XmlFields::parse(raw)?;
            notification.coupons = extract_coupons(&fields, notification.coupon_count)?;
        }

        Ok(notification)
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
}

/// Reads `count` indexed coupon pairs, preserving index order.
pub fn extract_coupons(fields: &XmlFields, count: u32) -> Result<Vec<CouponLineItem>, PaymentError> {
    (0..count)
        .map(|i| -> Result<CouponLineItem, PaymentError> {
            let coupon_id = fields.require(&format!("coupon_id_{}", i))?.to_string();
            let fee_name = format!("coupon_fee_{}", i);
            let coupon_fee = fields.require(&fee_name)?.trim().parse::<i64>().map_err(|_| {
                PaymentError::MalformedNotification(format!("{} is not an integer", fee_name))
            })?;
            let coupon_type = fields
                .get(&format!("coupon_type_{}", i))
                .filter(|t| !t.is_empty())
                .map(str::to_string);

            Ok(CouponLineItem {
                coupon_id,
                coupon_fee,
                coupon_type,
            })
        })
        .collect()
}

/// Runs the full callback flow and encodes the caller's decision.
///
/// `decide` is only invoked when both status layers report `SUCCESS`; any
/// error is returned instead of an acknowledgement so the caller can choose
/// between answering `FAIL` and letting the gateway redeliver.
pub fn handle_paid_notification<F>(raw: &[u8], decide: F) -> Result<AckReply, PaymentError>
where
    F: FnOnce(PaidNotification) -> (bool, String),
{
    let notification = PaidNotification::from_xml(raw)?;
    notification.status().check()?;

    let (accepted, reason) = decide(notification);
    Ok(AckReply::new(accepted, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const NO_COUPONS: &str = r#"<xml>
        <appid><![CDATA[wx2421b1c4370ec43b]]></appid>
        <attach><![CDATA[attach-7]]></attach>
        <bank_type><![CDATA[CFT]]></bank_type>
        <cash_fee>1000</cash_fee>
        <fee_type><![CDATA[CNY]]></fee_type>
        <is_subscribe><![CDATA[Y]]></is_subscribe>
        <mch_id><![CDATA[10000100]]></mch_id>
        <nonce_str><![CDATA[5d2b6c2a8db53831f7eda20af46e531c]]></nonce_str>
        <openid><![CDATA[oUpF8uMEb4qRXf22hE3X68TekukE]]></openid>
        <out_trade_no><![CDATA[1409811653]]></out_trade_no>
        <result_code><![CDATA[SUCCESS]]></result_code>
        <return_code><![CDATA[SUCCESS]]></return_code>
        <sign><![CDATA[B552ED6B279343CB493C5DD0D78AB241]]></sign>
        <time_end><![CDATA[20140903131540]]></time_end>
        <total_fee>1000</total_fee>
        <trade_type><![CDATA[JSAPI]]></trade_type>
        <transaction_id><![CDATA[1004400740201409030005092168]]></transaction_id>
    </xml>"#;

    fn with_coupons(body: &str) -> String {
        format!(
            r#"<xml>
            <return_code>SUCCESS</return_code>
            <result_code>SUCCESS</result_code>
            <out_trade_no>ON001</out_trade_no>
            <total_fee>1000</total_fee>
            <cash_fee>850</cash_fee>
            <coupon_fee>150</coupon_fee>
            {}
            </xml>"#,
            body
        )
    }

    // ══════════════════════════════════════════════════════════════
    // Envelope Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parses_payment_result_fields() {
        let notification = PaidNotification::from_xml(NO_COUPONS.as_bytes()).unwrap();

        assert_eq!(notification.app_id, "wx2421b1c4370ec43b");
        assert_eq!(notification.mch_id, "10000100");
        assert_eq!(notification.open_id, "oUpF8uMEb4qRXf22hE3X68TekukE");
        assert_eq!(notification.total_fee, 1000);
        assert_eq!(notification.cash_fee, 1000);
        assert_eq!(notification.fee_type.as_deref(), Some("CNY"));
        assert_eq!(notification.attach.as_deref(), Some("attach-7"));
        assert_eq!(notification.out_trade_no, "1409811653");
        assert_eq!(notification.transaction_id, "1004400740201409030005092168");
        assert_eq!(notification.time_end, "20140903131540");
        assert_eq!(notification.coupon_count, 0);
        assert!(notification.coupons.is_empty());
        assert_eq!(notification.settlement_total_fee, None);
    }

    #[test]
    fn malformed_body_is_deserialization_error() {
        let result = PaidNotification::from_xml(b"<xml><total_fee>abc</total_fee></xml>");
        assert!(matches!(result, Err(PaymentError::Deserialization(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Coupon Extraction Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn coupons_extracted_in_index_order() {
        let raw = with_coupons(
            "<coupon_count>2</coupon_count>\
             <coupon_id_1>B</coupon_id_1><coupon_fee_1>50</coupon_fee_1>\
             <coupon_id_0>A</coupon_id_0><coupon_fee_0>100</coupon_fee_0>",
        );

        let notification = PaidNotification::from_xml(raw.as_bytes()).unwrap();

        let pairs: Vec<(&str, i64)> = notification
            .coupons
            .iter()
            .map(|c| (c.coupon_id.as_str(), c.coupon_fee))
            .collect();
        assert_eq!(pairs, vec![("A", 100), ("B", 50)]);
        assert_eq!(notification.coupon_fee, Some(150));
    }

    #[test]
    fn coupon_type_read_when_present() {
        let raw = with_coupons(
            "<coupon_count>1</coupon_count>\
             <coupon_id_0>A</coupon_id_0><coupon_fee_0>100</coupon_fee_0>\
             <coupon_type_0>NO_CASH</coupon_type_0>",
        );

        let notification = PaidNotification::from_xml(raw.as_bytes()).unwrap();

        assert_eq!(notification.coupons[0].coupon_type.as_deref(), Some("NO_CASH"));
    }

    #[test]
    fn missing_indexed_coupon_is_malformed() {
        let raw = with_coupons(
            "<coupon_count>2</coupon_count>\
             <coupon_id_0>A</coupon_id_0><coupon_fee_0>100</coupon_fee_0>",
        );

        let result = PaidNotification::from_xml(raw.as_bytes());

        match result {
            Err(PaymentError::MalformedNotification(msg)) => assert!(msg.contains("coupon_id_1")),
            other => panic!("Expected MalformedNotification, got {:?}", other),
        }
    }

    #[test]
    fn non_integer_coupon_fee_is_malformed() {
        let raw = with_coupons(
            "<coupon_count>1</coupon_count>\
             <coupon_id_0>A</coupon_id_0><coupon_fee_0>1.5</coupon_fee_0>",
        );

        let result = PaidNotification::from_xml(raw.as_bytes());

        assert!(matches!(result, Err(PaymentError::MalformedNotification(_))));
    }

    #[test]
    fn indexed_fields_ignored_when_count_is_zero() {
        let raw = with_coupons("<coupon_id_0>A</coupon_id_0>");

        let notification = PaidNotification::from_xml(raw.as_bytes()).unwrap();

        assert!(notification.coupons.is_empty());
    }

    // ══════════════════════════════════════════════════════════════
    // Flow Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn accepted_decision_yields_success_ack() {
        let reply =
            handle_paid_notification(NO_COUPONS.as_bytes(), |_| (true, String::new())).unwrap();

        assert_eq!(reply.code, "SUCCESS");
        assert_eq!(reply.msg, "");
    }

    #[test]
    fn rejected_decision_yields_fail_ack() {
        let reply =
            handle_paid_notification(NO_COUPONS.as_bytes(), |_| (false, "duplicate".to_string()))
                .unwrap();

        assert_eq!(reply.code, "FAIL");
        assert_eq!(reply.msg, "duplicate");
    }

    #[test]
    fn decision_receives_parsed_notification() {
        let reply = handle_paid_notification(NO_COUPONS.as_bytes(), |n| {
            (n.out_trade_no == "1409811653" && n.total_fee == 1000, String::new())
        })
        .unwrap();

        assert!(reply.is_success());
    }

    #[test]
    fn failed_status_skips_decision() {
        let raw = r#"<xml>
            <return_code>SUCCESS</return_code>
            <result_code>FAIL</result_code>
            <err_code>SYSTEMERROR</err_code>
            <err_code_des>system busy</err_code_des>
        </xml>"#;
        let called = Cell::new(false);

        let result = handle_paid_notification(raw.as_bytes(), |_| {
            called.set(true);
            (true, String::new())
        });

        assert!(matches!(result, Err(PaymentError::Business { .. })));
        assert!(!called.get());
    }

    #[test]
    fn transport_failure_skips_decision() {
        let raw = "<xml><return_code>FAIL</return_code><return_msg>sig error</return_msg></xml>";
        let called = Cell::new(false);

        let result = handle_paid_notification(raw.as_bytes(), |_| {
            called.set(true);
            (true, String::new())
        });

        assert!(matches!(result, Err(PaymentError::Transport { .. })));
        assert!(!called.get());
    }

    #[test]
    fn malformed_coupons_skip_decision() {
        let raw = with_coupons("<coupon_count>1</coupon_count>");
        let called = Cell::new(false);

        let result = handle_paid_notification(raw.as_bytes(), |_| {
            called.set(true);
            (true, String::new())
        });

        assert!(matches!(result, Err(PaymentError::MalformedNotification(_))));
        assert!(!called.get());
    }
}
