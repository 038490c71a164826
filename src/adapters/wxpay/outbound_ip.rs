//! Resolves the host's outbound IPv4 address.
//!
//! Connecting a UDP socket sends no packets but makes the kernel pick the
//! route, so the socket's local address is the interface that would be used
//! to reach the remote address.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;

use crate::domain::payment::PaymentError;
use crate::ports::IpResolver;

const DEFAULT_REMOTE: ([u8; 4], u16) = ([8, 8, 8, 8], 80);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Route-based outbound address lookup.
#[derive(Debug, Clone)]
pub struct OutboundIpResolver {
    remote: SocketAddr,
    timeout: Duration,
}

impl OutboundIpResolver {
    pub fn new(remote: SocketAddr, timeout: Duration) -> Self {
        Self { remote, timeout }
    }
}

impl Default for OutboundIpResolver {
    fn default() -> Self {
        Self::new(SocketAddr::from(DEFAULT_REMOTE), DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl IpResolver for OutboundIpResolver {
    async fn resolve(&self) -> Result<IpAddr, PaymentError> {
        let lookup = async {
            let socket = UdpSocket::bind("0.0.0.0:0").await?;
            socket.connect(self.remote).await?;
            socket.local_addr()
        };

        let addr = tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| PaymentError::IpResolution("timed out".to_string()))?
            .map_err(|e| {
                tracing::warn!(remote = %self.remote, error = %e, "Outbound IP lookup failed");
                PaymentError::IpResolution(e.to_string())
            })?;

        let ip = addr.ip();
        if ip.is_unspecified() {
            return Err(PaymentError::IpResolution("no outbound route".to_string()));
        }
        Ok(ip)
    }
}
