//! HTTP adapter for gateway callbacks.
//!
//! - `POST /notify/paid` - Payment-result notification

mod handlers;
mod routes;

pub use handlers::{paid_notification, NotifyAppState};
pub use routes::notify_router;
