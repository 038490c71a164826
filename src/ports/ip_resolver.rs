//! Outbound client IP resolution.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::domain::payment::PaymentError;

/// Resolves the IP reported as `spbill_create_ip` when the caller gave none.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Returns the address, or `PaymentError::IpResolution`.
    async fn resolve(&self) -> Result<IpAddr, PaymentError>;
}
