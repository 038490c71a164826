//! OrderAssembler - Builds a signed unified-order request from an intent.

use std::sync::Arc;

use crate::domain::payment::{MerchantKey, OrderIntent, PaymentError, WireOrder, ORDER_NONCE_LEN};
use crate::ports::{IpResolver, NonceGenerator};

/// Turns an [`OrderIntent`] into a signed [`WireOrder`].
///
/// Every call draws a fresh nonce, so two orders assembled from the same
/// intent differ in `nonce_str` and `sign`.
pub struct OrderAssembler {
    nonces: Arc<dyn NonceGenerator>,
    ip_resolver: Arc<dyn IpResolver>,
    key: MerchantKey,
}

impl OrderAssembler {
    pub fn new(
        nonces: Arc<dyn NonceGenerator>,
        ip_resolver: Arc<dyn IpResolver>,
        key: MerchantKey,
    ) -> Self {
        Self {
            nonces,
            ip_resolver,
            key,
        }
    }

    pub fn key(&self) -> &MerchantKey {
        &self.key
    }

    /// Assembles and signs the order.
    ///
    /// # Errors
    ///
    /// - `IpResolution` - no client IP on the intent and the resolver failed
    /// - `Signing` - digest failure
    pub async fn prepare(&self, intent: &OrderIntent) -> Result<WireOrder, PaymentError> {
        let client_ip = match intent.declared_client_ip() {
            Some(ip) => ip.to_string(),
            None => self.ip_resolver.resolve().await?.to_string(),
        };
        let nonce = self.nonces.generate(ORDER_NONCE_LEN);

        WireOrder::unsigned(intent, nonce, client_ip, self.key.sign_type())
            .sign_with(self.key.expose())
    }
}
