//! Axum router for gateway callbacks.

use axum::{routing::post, Router};

use super::handlers::{paid_notification, NotifyAppState};

/// Create the callback router.
///
/// # Routes
/// - `POST /notify/paid` - Payment-result notification (signature verified
///   when the state carries a key)
///
/// # Example
///
/// ```ignore
/// let app = notify_router().with_state(NotifyAppState::new(Arc::new(LoggingDecider)));
/// ```
pub fn notify_router() -> Router<NotifyAppState> {
    Router::new().route("/notify/paid", post(paid_notification))
}
