//! Payment gateway protocol domain.
//!
//! Signing, order assembly, envelope checks and notification parsing for the
//! gateway's XML protocol. Everything here is pure and synchronous; I/O lives
//! behind the ports.
//!
//! # Module Structure
//!
//! - `signer` - Canonical field set, MD5 / HMAC-SHA256 signing and verification
//! - `order` - OrderIntent and the signed WireOrder
//! - `client_params` - Signed front-end payment parameters
//! - `envelope` - Two-tier status check and unified-order reply
//! - `notification` - Payment-result callback parsing and coupon extraction
//! - `reply` - Acknowledgement encoder
//! - `xml_fields` - Generic field view used for coupons and signature checks

mod client_params;
mod envelope;
mod errors;
mod notification;
mod order;
mod reply;
mod signer;
mod xml_fields;

pub use client_params::{ClientPaymentParams, MAX_CLIENT_NONCE_LEN};
pub use envelope::{GatewayStatus, SubmissionResult, UnifyResponse, FAIL, SUCCESS};
pub use errors::PaymentError;
pub use notification::{extract_coupons, handle_paid_notification, CouponLineItem, PaidNotification};
pub use order::{
    format_payment_time, OrderIntent, WireOrder, LIMIT_PAY_NO_CREDIT, ORDER_NONCE_LEN,
    PAYMENT_TIME_FORMAT, TRADE_TYPE_JSAPI,
};
pub use reply::AckReply;
pub use signer::{sign, verify, CanonicalFieldSet, MerchantKey, SignType};
pub use xml_fields::{verify_xml_signature, XmlFields};
