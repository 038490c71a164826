//! Merchant decision hook for payment notifications.

use async_trait::async_trait;

use crate::domain::payment::PaidNotification;

/// Outcome of the merchant's own processing of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub accepted: bool,
    pub reason: String,
}

impl Decision {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            reason: String::new(),
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: reason.into(),
        }
    }
}

/// Decides whether a verified, successful payment has been handled.
///
/// Called at most once per delivery, and only after both status layers
/// report `SUCCESS`. The same notification may be delivered more than once;
/// implementations should be idempotent on `out_trade_no`.
#[async_trait]
pub trait NotificationDecider: Send + Sync {
    async fn decide(&self, notification: PaidNotification) -> Decision;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_decider_is_object_safe() {
        fn _accepts_dyn(_decider: &dyn NotificationDecider) {}
    }

    #[test]
    fn decision_constructors() {
        assert_eq!(Decision::accept(), Decision { accepted: true, reason: String::new() });

        let rejected = Decision::reject("duplicate");
        assert!(!rejected.accepted);
        assert_eq!(rejected.reason, "duplicate");
    }
}
