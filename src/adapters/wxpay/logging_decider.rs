//! Default decider for the standalone callback server.

use async_trait::async_trait;

use crate::domain::payment::PaidNotification;
use crate::ports::{Decision, NotificationDecider};

/// Accepts every successful payment after logging it.
///
/// Suitable when downstream processing reads the logs; merchants with their
/// own order store supply a decider of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDecider;

#[async_trait]
impl NotificationDecider for LoggingDecider {
    async fn decide(&self, notification: PaidNotification) -> Decision {
        tracing::info!(
            out_trade_no = %notification.out_trade_no,
            transaction_id = %notification.transaction_id,
            total_fee = notification.total_fee,
            coupon_count = notification.coupons.len(),
            "Payment notification accepted"
        );
        Decision::accept()
    }
}
