//! Payment gateway adapters.
//!
//! - `HttpGatewayTransport` - reqwest XML transport
//! - `RandomNonce` - alphanumeric nonces from `rand`
//! - `OutboundIpResolver` - host address via UDP routing
//! - `LoggingDecider` - accept-and-log notification decider
//! - `WxPayClient` - merchant facade over the handlers
//!
//! Test doubles (`MockGatewayTransport`, `FixedNonce`, `StaticIpResolver`,
//! `FailingIpResolver`, `RecordingDecider`) live alongside.

mod client;
mod http_transport;
mod logging_decider;
mod mock_transport;
mod outbound_ip;
mod random_nonce;

pub use client::WxPayClient;
pub use http_transport::HttpGatewayTransport;
pub use logging_decider::LoggingDecider;
pub use mock_transport::{
    FailingIpResolver, FixedNonce, MockGatewayTransport, RecordedPost, RecordingDecider,
    StaticIpResolver,
};
pub use outbound_ip::OutboundIpResolver;
pub use random_nonce::RandomNonce;
