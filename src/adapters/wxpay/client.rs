//! Merchant-facing facade wiring the production adapters together.

use std::sync::Arc;

use crate::application::handlers::payment::{OrderAssembler, UnifyOrderCommand, UnifyOrderHandler};
use crate::config::PaymentConfig;
use crate::domain::payment::{ClientPaymentParams, OrderIntent, PaymentError, SubmissionResult};
use crate::ports::{GatewayTransport, IpResolver, NonceGenerator};

use super::http_transport::HttpGatewayTransport;
use super::outbound_ip::OutboundIpResolver;
use super::random_nonce::RandomNonce;

/// One merchant account on the gateway.
///
/// # Example
///
/// ```ignore
/// let client = WxPayClient::from_config(&config.payment)?;
/// let intent = client.intent("oUser1", 100, "Item", "ON001");
/// let result = client.unify(intent).await?;
/// let params = client.client_params(&nonce, &result.prepay_id)?;
/// ```
pub struct WxPayClient {
    app_id: String,
    mch_id: String,
    notify_url: String,
    unify: UnifyOrderHandler,
}

impl WxPayClient {
    /// Builds a client with the HTTP transport, random nonces and route-based
    /// IP resolution.
    pub fn from_config(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let transport = HttpGatewayTransport::new(config.base_url.clone(), config.request_timeout())?;
        Ok(Self::with_ports(
            config,
            Arc::new(transport),
            Arc::new(RandomNonce),
            Arc::new(OutboundIpResolver::default()),
        ))
    }

    /// Builds a client over caller-supplied ports.
    pub fn with_ports(
        config: &PaymentConfig,
        transport: Arc<dyn GatewayTransport>,
        nonces: Arc<dyn NonceGenerator>,
        ip_resolver: Arc<dyn IpResolver>,
    ) -> Self {
        let assembler = OrderAssembler::new(nonces, ip_resolver, config.merchant_key());
        let unify = UnifyOrderHandler::new(assembler, transport)
            .with_response_verification(config.verify_response_signature);

        Self {
            app_id: config.app_id.clone(),
            mch_id: config.mch_id.clone(),
            notify_url: config.notify_url.clone(),
            unify,
        }
    }

    /// Starts an intent pre-filled with this merchant's IDs and notify URL.
    pub fn intent(
        &self,
        open_id: impl Into<String>,
        total_fee: i64,
        body: impl Into<String>,
        out_trade_no: impl Into<String>,
    ) -> OrderIntent {
        OrderIntent::new(
            self.app_id.clone(),
            self.mch_id.clone(),
            open_id,
            total_fee,
            body,
            out_trade_no,
            self.notify_url.clone(),
        )
    }

    /// Submits the order to the unified-order endpoint.
    pub async fn unify(&self, intent: OrderIntent) -> Result<SubmissionResult, PaymentError> {
        let out_trade_no = intent.out_trade_no.clone();
        let result = self.unify.handle(UnifyOrderCommand { intent }).await;

        match &result {
            Ok(submission) => tracing::info!(
                out_trade_no = %out_trade_no,
                prepay_id = %submission.prepay_id,
                "Order submitted"
            ),
            Err(err) => tracing::warn!(
                out_trade_no = %out_trade_no,
                error = %err,
                retryable = err.is_retryable(),
                "Order submission failed"
            ),
        }

        result
    }

    /// Signs the front-end payment parameters for a prepay session.
    pub fn client_params(
        &self,
        nonce: &str,
        prepay_id: &str,
    ) -> Result<ClientPaymentParams, PaymentError> {
        let key = self.unify.assembler().key();
        ClientPaymentParams::generate(&self.app_id, key.expose(), nonce, prepay_id)
    }
}
