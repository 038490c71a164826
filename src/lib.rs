//! WeChat Pay mini-program gateway adapter
//!
//! Builds and signs unified-order requests, derives the front-end payment
//! parameters, and verifies and acknowledges payment-result callbacks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
