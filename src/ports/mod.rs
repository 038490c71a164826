//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Gateway Ports
//!
//! - `GatewayTransport` - XML POST to the payment gateway
//! - `NonceGenerator` - Random `nonce_str` source
//! - `IpResolver` - Fallback `spbill_create_ip` resolution
//!
//! ## Notification Ports
//!
//! - `NotificationDecider` - Merchant processing of a paid notification

mod gateway_transport;
mod ip_resolver;
mod nonce_generator;
mod notification_decider;

pub use gateway_transport::GatewayTransport;
pub use ip_resolver::IpResolver;
pub use nonce_generator::NonceGenerator;
pub use notification_decider::{Decision, NotificationDecider};
