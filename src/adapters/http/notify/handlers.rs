//! HTTP handlers for gateway callbacks.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::payment::{
    HandlePaidNotificationCommand, HandlePaidNotificationHandler,
};
use crate::domain::payment::{AckReply, MerchantKey, PaymentError};
use crate::ports::NotificationDecider;

const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Sent when the acknowledgement itself cannot be encoded.
const FALLBACK_FAIL_XML: &str =
    "<xml><return_code>FAIL</return_code><return_msg>internal error</return_msg></xml>";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the callback endpoints.
#[derive(Clone)]
pub struct NotifyAppState {
    pub decider: Arc<dyn NotificationDecider>,
    /// When set, callbacks must carry a valid `sign` for this key.
    pub verification_key: Option<MerchantKey>,
}

impl NotifyAppState {
    pub fn new(decider: Arc<dyn NotificationDecider>) -> Self {
        Self {
            decider,
            verification_key: None,
        }
    }

    pub fn with_verification_key(mut self, key: MerchantKey) -> Self {
        self.verification_key = Some(key);
        self
    }

    pub fn paid_notification_handler(&self) -> HandlePaidNotificationHandler {
        let handler = HandlePaidNotificationHandler::new(self.decider.clone());
        match &self.verification_key {
            Some(key) => handler.with_signature_verification(key.clone()),
            None => handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /notify/paid - Payment-result notification
///
/// Always answers HTTP 200 with an `<xml>` acknowledgement. Failures become a
/// `FAIL` reply so the gateway redelivers later.
pub async fn paid_notification(
    State(state): State<NotifyAppState>,
    body: Bytes,
) -> Response {
    let handler = state.paid_notification_handler();
    let cmd = HandlePaidNotificationCommand {
        payload: body.to_vec(),
    };

    let reply = match handler.handle(cmd).await {
        Ok(reply) => {
            if !reply.is_success() {
                tracing::info!(reason = %reply.msg, "Payment notification declined");
            }
            reply
        }
        Err(err) => {
            tracing::warn!(error = %err, "Payment notification rejected");
            AckReply::fail(failure_reason(&err))
        }
    };

    xml_response(&reply)
}

fn failure_reason(err: &PaymentError) -> String {
    match err {
        PaymentError::InvalidSignature => "invalid signature".to_string(),
        PaymentError::MalformedNotification(_) | PaymentError::Deserialization(_) => {
            "malformed notification".to_string()
        }
        other => other.to_string(),
    }
}

fn xml_response(reply: &AckReply) -> Response {
    encoded_response(reply.to_xml())
}

fn encoded_response(encoded: Result<String, PaymentError>) -> Response {
    let xml = encoded.unwrap_or_else(|err| {
        tracing::error!(error = %err, "Failed to encode acknowledgement");
        FALLBACK_FAIL_XML.to_string()
    });
    (StatusCode::OK, [(header::CONTENT_TYPE, XML_CONTENT_TYPE)], xml).into_response()
}
