//! reqwest-backed transport for the gateway's XML API.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::payment::PaymentError;
use crate::ports::GatewayTransport;

/// Posts XML to `base_url + path` with a per-request timeout.
pub struct HttpGatewayTransport {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpGatewayTransport {
    /// Creates a transport. A trailing `/` on `base_url` is ignored.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentError::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl GatewayTransport for HttpGatewayTransport {
    async fn post_xml(&self, path: &str, body: String) -> Result<Vec<u8>, PaymentError> {
        let url = self.url(path);

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "Gateway request failed");
                PaymentError::Http(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Gateway returned HTTP error");
            return Err(PaymentError::Http(format!("gateway returned HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PaymentError::Http(format!("failed to read response body: {}", e)))?;

        tracing::debug!(url = %url, bytes = bytes.len(), "Gateway response received");
        Ok(bytes.to_vec())
    }
}
