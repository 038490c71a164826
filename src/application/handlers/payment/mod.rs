//! Payment handlers.
//!
//! - `OrderAssembler` - intent to signed wire order
//! - `UnifyOrderHandler` - unified-order submission
//! - `HandlePaidNotificationHandler` - payment-result callbacks

mod paid_notification;
mod prepare_order;
mod unify_order;

pub use paid_notification::{HandlePaidNotificationCommand, HandlePaidNotificationHandler};
pub use prepare_order::OrderAssembler;
pub use unify_order::{UnifyOrderCommand, UnifyOrderHandler, UNIFIED_ORDER_PATH};
