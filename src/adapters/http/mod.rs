//! HTTP adapters - Endpoints the gateway calls back into.

pub mod notify;

pub use notify::{notify_router, NotifyAppState};
