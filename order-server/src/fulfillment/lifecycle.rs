//! Order lifecycle
//!
//! ```text
//! PENDING -> ACCEPTED -> IN_PROGRESS -> READY -> DELIVERED
//!         \-> REJECTED
//! ```
//!
//! Only the order's vendor may advance it. The write is conditional on the
//! status observed when the request was checked.

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderStatus};

use crate::db::{OrderTransition, Store};
use crate::error::ServiceResult;

/// Vendor action on an order
///
/// `notes` and `ready_time_minutes` overwrite the stored values only when
/// supplied. Leaving one out keeps what an earlier step set, so a later
/// `READY` without notes does not wipe the notes given on `ACCEPTED`.
#[derive(Debug, Clone)]
pub struct ProcessOrder {
    pub status: OrderStatus,
    /// Replaces the stored notes when `Some`
    pub notes: Option<String>,
    /// Replaces the stored ready time when `Some`
    pub ready_time_minutes: Option<i32>,
}

fn invalid_transition(from: OrderStatus, to: OrderStatus) -> AppError {
    AppError::new(ErrorCode::InvalidStatusTransition)
        .with_detail("from", format!("{from:?}"))
        .with_detail("to", format!("{to:?}"))
}

/// Order owned by `vendor_id`; anyone else's order does not exist
pub async fn vendor_order(store: &dyn Store, vendor_id: i64, order_id: i64) -> ServiceResult<Order> {
    store
        .find_order(order_id)
        .await?
        .filter(|o| o.vendor_id == vendor_id)
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).into())
}

pub async fn vendor_orders(store: &dyn Store, vendor_id: i64) -> ServiceResult<Vec<Order>> {
    Ok(store.orders_for_vendor(vendor_id).await?)
}

/// Move the order to `action.status` if the transition table allows it
pub async fn advance(
    store: &dyn Store,
    vendor_id: i64,
    order_id: i64,
    action: ProcessOrder,
    now: i64,
) -> ServiceResult<Order> {
    let order = vendor_order(store, vendor_id, order_id).await?;
    let from = order.status;
    let to = action.status;
    if !from.can_transition_to(to) {
        return Err(invalid_transition(from, to).into());
    }

    let change = OrderTransition {
        from,
        to,
        notes: action.notes,
        ready_time_minutes: action.ready_time_minutes,
        updated_at: now,
    };
    let updated = store
        .transition_order(order_id, &change)
        .await?
        .ok_or_else(|| {
            tracing::info!(order_id, ?from, ?to, "Order status changed concurrently");
            invalid_transition(from, to)
        })?;

    tracing::info!(order_id, vendor_id, ?from, ?to, "Order status advanced");
    Ok(updated)
}
