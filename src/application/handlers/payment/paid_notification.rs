//! HandlePaidNotificationHandler - Processes payment-result callbacks.

use std::sync::Arc;

use crate::domain::payment::{AckReply, MerchantKey, PaidNotification, PaymentError, XmlFields};
use crate::ports::NotificationDecider;

/// Command carrying one raw callback body.
#[derive(Debug, Clone)]
pub struct HandlePaidNotificationCommand {
    pub payload: Vec<u8>,
}

/// Verifies, parses, and hands successful payments to the decider.
pub struct HandlePaidNotificationHandler {
    decider: Arc<dyn NotificationDecider>,
    verification_key: Option<MerchantKey>,
}

impl HandlePaidNotificationHandler {
    pub fn new(decider: Arc<dyn NotificationDecider>) -> Self {
        Self {
            decider,
            verification_key: None,
        }
    }

    /// Requires every callback to carry a valid `sign` for `key`.
    pub fn with_signature_verification(mut self, key: MerchantKey) -> Self {
        self.verification_key = Some(key);
        self
    }

    /// Returns the acknowledgement to send back to the gateway.
    ///
    /// The decider only runs when the signature (if required) matches and
    /// both status layers report `SUCCESS`.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - verification enabled and `sign` mismatched
    /// - `MalformedNotification`, `Deserialization` - unreadable body
    /// - `Transport`, `Business` - gateway reported a failure
    pub async fn handle(
        &self,
        cmd: HandlePaidNotificationCommand,
    ) -> Result<AckReply, PaymentError> {
        // 1. Verify signature
        if let Some(key) = &self.verification_key {
            XmlFields::parse(&cmd.payload)?.verify_signature(key.expose())?;
        }

        // 2. Parse and check status
        let notification = PaidNotification::from_xml(&cmd.payload)?;
        notification.status().check()?;

        // 3. Let the merchant decide
        let decision = self.decider.decide(notification).await;
        Ok(AckReply::new(decision.accepted, decision.reason))
    }
}
