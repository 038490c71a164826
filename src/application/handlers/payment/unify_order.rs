//! UnifyOrderHandler - Submits an order to the unified-order endpoint.

use std::sync::Arc;

use crate::domain::payment::{OrderIntent, PaymentError, SubmissionResult, UnifyResponse, XmlFields};
use crate::ports::GatewayTransport;

use super::prepare_order::OrderAssembler;

/// Endpoint path, relative to the gateway base URL.
pub const UNIFIED_ORDER_PATH: &str = "/pay/unifiedorder";

/// Command to submit one order.
#[derive(Debug, Clone)]
pub struct UnifyOrderCommand {
    pub intent: OrderIntent,
}

/// Handler for unified-order submission.
///
/// One assemble, one POST, one parse. Nothing is retried; callers decide
/// based on [`PaymentError::is_retryable`].
pub struct UnifyOrderHandler {
    assembler: OrderAssembler,
    transport: Arc<dyn GatewayTransport>,
    verify_response: bool,
}

impl UnifyOrderHandler {
    pub fn new(assembler: OrderAssembler, transport: Arc<dyn GatewayTransport>) -> Self {
        Self {
            assembler,
            transport,
            verify_response: false,
        }
    }

    /// Also checks the reply's own `sign` once both status layers succeed.
    pub fn with_response_verification(mut self, enabled: bool) -> Self {
        self.verify_response = enabled;
        self
    }

    pub fn assembler(&self) -> &OrderAssembler {
        &self.assembler
    }

    /// Assembles, submits, and interprets the gateway reply.
    ///
    /// # Errors
    ///
    /// - `IpResolution`, `Signing`, `Serialization` - assembly failed, nothing sent
    /// - `Http` - transport failure
    /// - `Deserialization` - unreadable reply
    /// - `Transport` - `return_code` is not `SUCCESS`
    /// - `Business` - `result_code` is not `SUCCESS`
    /// - `InvalidSignature` - reply signature mismatch (verification enabled)
    pub async fn handle(&self, cmd: UnifyOrderCommand) -> Result<SubmissionResult, PaymentError> {
        // 1. Assemble and sign
        let order = self.assembler.prepare(&cmd.intent).await?;
        let body = order.to_xml()?;

        // 2. Submit
        let raw = self.transport.post_xml(UNIFIED_ORDER_PATH, body).await?;

        // 3. Interpret both status layers
        let response = UnifyResponse::from_xml(&raw)?;
        response.status().check()?;

        if self.verify_response {
            XmlFields::parse(&raw)
                .map_err(|e| PaymentError::Deserialization(e.to_string()))?
                .verify_signature(self.assembler.key().expose())?;
        }

        response.into_result()
    }
}
