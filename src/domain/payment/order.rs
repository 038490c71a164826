//! Unified-order request model.
//!
//! `OrderIntent` is what the merchant asks for; `WireOrder` is what the gateway
//! actually receives. The signature is computed over the canonical field set
//! derived from the `WireOrder` itself, so the signed fields and the sent
//! fields cannot drift apart.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::errors::PaymentError;
use super::signer::{self, CanonicalFieldSet, SignType};

/// Trade type for mini-program (JSAPI) payments.
pub const TRADE_TYPE_JSAPI: &str = "JSAPI";

/// `limit_pay` value that forbids credit-card payment.
pub const LIMIT_PAY_NO_CREDIT: &str = "no_credit";

/// `yyyyMMddHHmmss`, the gateway's timestamp format.
pub const PAYMENT_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Length of the nonce generated for every submission.
pub const ORDER_NONCE_LEN: usize = 32;

/// Merchant-declared order.
///
/// Amounts are integer minor currency units (fen). Timestamps are wall-clock
/// times in the gateway's time zone and are formatted as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    /// Mini-program app ID.
    pub app_id: String,

    /// Merchant ID.
    pub mch_id: String,

    /// Payer's open ID within the app.
    pub open_id: String,

    /// Order total in minor units.
    pub total_fee: i64,

    /// Goods description shown to the payer.
    pub body: String,

    /// Merchant order number, unique per merchant.
    pub out_trade_no: String,

    /// Publicly reachable callback URL, without query parameters.
    pub notify_url: String,

    /// Terminal IP. Resolved from the outbound route when absent.
    pub client_ip: Option<String>,

    /// Forbid credit-card payment.
    pub no_credit: bool,

    /// Start of the validity window.
    pub started_at: Option<NaiveDateTime>,

    /// End of the validity window.
    pub expired_at: Option<NaiveDateTime>,

    /// Coupon/discount tag.
    pub goods_tag: Option<String>,

    /// Goods detail (JSON as defined by the gateway).
    pub detail: Option<String>,

    /// Merchant data returned verbatim in the notification.
    pub attach: Option<String>,
}

impl OrderIntent {
    /// Creates an intent with all mandatory fields.
    pub fn new(
        app_id: impl Into<String>,
        mch_id: impl Into<String>,
        open_id: impl Into<String>,
        total_fee: i64,
        body: impl Into<String>,
        out_trade_no: impl Into<String>,
        notify_url: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            mch_id: mch_id.into(),
            open_id: open_id.into(),
            total_fee,
            body: body.into(),
            out_trade_no: out_trade_no.into(),
            notify_url: notify_url.into(),
            ..Default::default()
        }
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    pub fn with_validity(mut self, started_at: NaiveDateTime, expired_at: NaiveDateTime) -> Self {
        self.started_at = Some(started_at);
        self.expired_at = Some(expired_at);
        self
    }

    pub fn with_no_credit(mut self) -> Self {
        self.no_credit = true;
        self
    }

    pub fn with_goods_tag(mut self, tag: impl Into<String>) -> Self {
        self.goods_tag = Some(tag.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_attach(mut self, attach: impl Into<String>) -> Self {
        self.attach = Some(attach.into());
        self
    }

    /// Client IP supplied by the caller, treating an empty string as absent.
    pub fn declared_client_ip(&self) -> Option<&str> {
        self.client_ip.as_deref().filter(|ip| !ip.is_empty())
    }
}

/// The complete field set sent to the unified-order endpoint.
///
/// Built once per submission; the nonce makes every instance unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireOrder {
    #[serde(rename = "appid")]
    pub app_id: String,

    pub mch_id: String,

    pub nonce_str: String,

    pub sign: String,

    pub sign_type: SignType,

    pub body: String,

    pub out_trade_no: String,

    pub total_fee: i64,

    pub spbill_create_ip: String,

    pub notify_url: String,

    pub trade_type: String,

    #[serde(rename = "openid")]
    pub open_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_expire: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub goods_tag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_pay: Option<String>,
}

impl WireOrder {
    /// Maps an intent onto the wire field set, leaving `sign` empty.
    ///
    /// Optional fields are only populated when the intent carries a
    /// non-default value.
    pub fn unsigned(
        intent: &OrderIntent,
        nonce_str: impl Into<String>,
        client_ip: impl Into<String>,
        sign_type: SignType,
    ) -> Self {
        Self {
            app_id: intent.app_id.clone(),
            mch_id: intent.mch_id.clone(),
            nonce_str: nonce_str.into(),
            sign: String::new(),
            sign_type,
            body: intent.body.clone(),
            out_trade_no: intent.out_trade_no.clone(),
            total_fee: intent.total_fee,
            spbill_create_ip: client_ip.into(),
            notify_url: intent.notify_url.clone(),
            trade_type: TRADE_TYPE_JSAPI.to_string(),
            open_id: intent.open_id.clone(),
            time_start: intent.started_at.map(format_payment_time),
            time_expire: intent.expired_at.map(format_payment_time),
            goods_tag: non_empty(&intent.goods_tag),
            detail: non_empty(&intent.detail),
            attach: non_empty(&intent.attach),
            limit_pay: intent.no_credit.then(|| LIMIT_PAY_NO_CREDIT.to_string()),
        }
    }

    /// Every non-empty field the gateway receives, except `sign` itself.
    pub fn canonical_fields(&self) -> CanonicalFieldSet {
        let mut fields = CanonicalFieldSet::new();
        fields
            .insert("appid", self.app_id.as_str())
            .insert("mch_id", self.mch_id.as_str())
            .insert("nonce_str", self.nonce_str.as_str())
            .insert("sign_type", self.sign_type.as_str())
            .insert("body", self.body.as_str())
            .insert("out_trade_no", self.out_trade_no.as_str())
            .insert("total_fee", self.total_fee.to_string())
            .insert("spbill_create_ip", self.spbill_create_ip.as_str())
            .insert("notify_url", self.notify_url.as_str())
            .insert("trade_type", self.trade_type.as_str())
            .insert("openid", self.open_id.as_str());

        let optional = [
            ("time_start", &self.time_start),
            ("time_expire", &self.time_expire),
            ("goods_tag", &self.goods_tag),
            ("detail", &self.detail),
            ("attach", &self.attach),
            ("limit_pay", &self.limit_pay),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                fields.insert(name, value.as_str());
            }
        }

        fields
    }

    /// Signs the order with the merchant key using its declared algorithm.
    pub fn sign_with(mut self, key: &str) -> Result<Self, PaymentError> {
        self.sign = signer::sign(&self.canonical_fields(), key, self.sign_type)?;
        Ok(self)
    }

    /// Renders the `<xml>` request document.
    pub fn to_xml(&self) -> Result<String, PaymentError> {
        quick_xml::se::to_string_with_root("xml", self)
            .map_err(|e| PaymentError::Serialization(e.to_string()))
    }
}

/// Formats a timestamp as `yyyyMMddHHmmss`.
pub fn format_payment_time(at: NaiveDateTime) -> String {
    at.format(PAYMENT_TIME_FORMAT).to_string()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
