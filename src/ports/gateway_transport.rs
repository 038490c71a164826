//! Transport port for the gateway's XML-over-HTTP API.

use async_trait::async_trait;

use crate::domain::payment::PaymentError;

/// Posts XML documents to the gateway.
///
/// Implementations own the base URL, timeouts and connection pooling. A
/// dropped future abandons the request; nothing is retried here.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// POSTs `body` (`Content-Type: text/xml`) to `path` and returns the raw
    /// response body.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Http` on connection failure, timeout, or a
    /// non-success HTTP status.
    async fn post_xml(&self, path: &str, body: String) -> Result<Vec<u8>, PaymentError>;
}
