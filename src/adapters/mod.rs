//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `wxpay` - Gateway transport, nonce and IP sources, merchant facade
//! - `http` - Axum endpoints for gateway callbacks

pub mod http;
pub mod wxpay;

pub use wxpay::{HttpGatewayTransport, OutboundIpResolver, RandomNonce, WxPayClient};
