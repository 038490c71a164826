//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `payment` - Signing, order assembly, gateway envelopes, notifications
//!   and acknowledgements

pub mod payment;
