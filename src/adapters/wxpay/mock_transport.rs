//! Test doubles for the gateway ports.
//!
//! Supports:
//! - Canned gateway replies
//! - Error injection
//! - Call tracking
//! - Deterministic nonces and client IPs

use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::payment::{PaidNotification, PaymentError};
use crate::ports::{Decision, GatewayTransport, IpResolver, NonceGenerator, NotificationDecider};

/// Recorded `post_xml` call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub path: String,
    pub body: String,
}

#[derive(Default)]
struct MockState {
    /// Replies consumed in order; the last one repeats.
    replies: VecDeque<Vec<u8>>,

    /// Error to return instead of any reply.
    error: Option<PaymentError>,

    call_log: Vec<RecordedPost>,
}

/// In-memory gateway.
///
/// # Example
///
/// ```ignore
/// let transport = MockGatewayTransport::replying("<xml>...</xml>");
/// let handler = UnifyOrderHandler::new(assembler, Arc::new(transport));
/// ```
#[derive(Default, Clone)]
pub struct MockGatewayTransport {
    inner: Arc<Mutex<MockState>>,
}

impl MockGatewayTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that always answers with `body`.
    pub fn replying(body: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.push_reply(body);
        mock
    }

    /// A gateway that is never reachable.
    pub fn failing(message: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.set_error(PaymentError::Http(message.into()));
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    pub fn push_reply(&self, body: impl Into<String>) {
        self.inner
            .lock()
            .unwrap()
            .replies
            .push_back(body.into().into_bytes());
    }

    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().error = Some(error);
    }

    pub fn clear_error(&self) {
        self.inner.lock().unwrap().error = None;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<RecordedPost> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().call_log.len()
    }
}

#[async_trait]
impl GatewayTransport for MockGatewayTransport {
    async fn post_xml(&self, path: &str, body: String) -> Result<Vec<u8>, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push(RecordedPost {
            path: path.to_string(),
            body,
        });

        if let Some(error) = state.error.clone() {
            return Err(error);
        }

        let reply = if state.replies.len() > 1 {
            state.replies.pop_front()
        } else {
            state.replies.front().cloned()
        };
        reply.ok_or_else(|| PaymentError::Http("no reply configured".to_string()))
    }
}

/// Always returns the same nonce, truncated to the requested length.
#[derive(Debug, Clone)]
pub struct FixedNonce(String);

impl FixedNonce {
    pub fn new(nonce: impl Into<String>) -> Self {
        Self(nonce.into())
    }
}

impl NonceGenerator for FixedNonce {
    fn generate(&self, len: usize) -> String {
        self.0.chars().take(len).collect()
    }
}

/// Resolves to a fixed address.
#[derive(Debug, Clone, Copy)]
pub struct StaticIpResolver(IpAddr);

impl StaticIpResolver {
    pub fn new(ip: IpAddr) -> Self {
        Self(ip)
    }
}

#[async_trait]
impl IpResolver for StaticIpResolver {
    async fn resolve(&self) -> Result<IpAddr, PaymentError> {
        Ok(self.0)
    }
}

/// Never resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingIpResolver;

#[async_trait]
impl IpResolver for FailingIpResolver {
    async fn resolve(&self) -> Result<IpAddr, PaymentError> {
        Err(PaymentError::IpResolution("no network interface".to_string()))
    }
}

/// Returns a fixed decision and records every notification it saw.
#[derive(Clone)]
pub struct RecordingDecider {
    decision: Decision,
    seen: Arc<Mutex<Vec<PaidNotification>>>,
}

impl RecordingDecider {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn seen(&self) -> Vec<PaidNotification> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDecider for RecordingDecider {
    async fn decide(&self, notification: PaidNotification) -> Decision {
        self.seen.lock().unwrap().push(notification);
        self.decision.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_are_consumed_in_order_and_last_repeats() {
        let mock = MockGatewayTransport::new();
        mock.push_reply("one");
        mock.push_reply("two");

        assert_eq!(mock.post_xml("/a", String::new()).await.unwrap(), b"one");
        assert_eq!(mock.post_xml("/a", String::new()).await.unwrap(), b"two");
        assert_eq!(mock.post_xml("/a", String::new()).await.unwrap(), b"two");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn injected_error_wins_over_reply() {
        let mock = MockGatewayTransport::replying("ok");
        mock.set_error(PaymentError::Http("down".into()));

        assert!(mock.post_xml("/a", String::new()).await.is_err());

        mock.clear_error();
        assert!(mock.post_xml("/a", String::new()).await.is_ok());
    }

    #[tokio::test]
    async fn unconfigured_mock_is_http_error() {
        let result = MockGatewayTransport::new().post_xml("/a", String::new()).await;
        assert!(matches!(result, Err(PaymentError::Http(_))));
    }

    #[test]
    fn fixed_nonce_truncates() {
        assert_eq!(FixedNonce::new("ABCDEF").generate(3), "ABC");
    }
}
