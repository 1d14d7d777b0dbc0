//! Order assembly
//!
//! Prices cart lines against the current catalog and turns a customer's OPEN
//! transaction into a PENDING order with an assigned shipper.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{CartLine, Food, Order, OrderLineItem, OrderStatus};

use super::ledger;
use super::matching::ShipperMatcher;
use crate::db::Store;
use crate::error::ServiceResult;
use crate::util::{generate_code, snowflake_id};

/// Order placement request
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub transaction_id: i64,
    /// Explicit lines; the stored cart is used when absent
    pub items: Option<Vec<CartLine>>,
}

/// Snapshot lines whose food still exists and sum `price * quantity`.
///
/// Lines with an unknown food or a non-positive quantity are dropped.
/// Repeated lines for one food merge into the first, quantities summed.
pub fn price_lines(lines: &[CartLine], foods: &[Food]) -> (Vec<OrderLineItem>, Decimal) {
    let by_id: HashMap<i64, &Food> = foods.iter().map(|f| (f.id, f)).collect();
    let mut items: Vec<OrderLineItem> = Vec::new();
    for line in lines.iter().filter(|line| line.quantity > 0) {
        let Some(food) = by_id.get(&line.food_id) else {
            continue;
        };
        match items.iter_mut().find(|item| item.food.id == food.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(line.quantity),
            None => items.push(OrderLineItem {
                food: (*food).clone(),
                quantity: line.quantity,
            }),
        }
    }
    let total = items.iter().map(OrderLineItem::line_total).sum();
    (items, total)
}

/// Place an order from the customer's OPEN transaction.
///
/// Nothing is written unless every step succeeds: the transaction is only
/// consumed together with the order insert.
pub async fn assemble(
    store: &dyn Store,
    matcher: &dyn ShipperMatcher,
    customer_id: i64,
    request: PlaceOrder,
    now: i64,
) -> ServiceResult<Order> {
    // 1. Resolve lines (request body, else stored cart)
    if store.find_customer(customer_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::CustomerNotFound).into());
    }
    let lines = match request.items {
        Some(items) => items,
        None => store.cart(customer_id).await?,
    };
    let food_ids: Vec<i64> = lines.iter().map(|l| l.food_id).collect();
    let foods = store.find_foods(&food_ids).await?;
    let (items, total_amount) = price_lines(&lines, &foods);

    // 2. Nothing orderable, no side effects
    let Some(first) = items.first() else {
        return Err(AppError::new(ErrorCode::OrderEmpty).into());
    };
    let vendor_id = first.food.vendor_id;
    if items.iter().any(|i| i.food.vendor_id != vendor_id) {
        tracing::warn!(
            customer_id,
            vendor_id,
            "Order mixes foods from several vendors, assigning to the first"
        );
    }
    let vendor = store
        .find_vendor(vendor_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::VendorNotFound))?;

    // 3. One unit of work; any early return drops `tx` and rolls back
    let mut tx = store.begin().await?;

    let txn = ledger::consume(tx.as_mut(), request.transaction_id, customer_id).await?;

    let Some(shipper) = matcher.find_nearest(tx.as_mut(), &vendor).await? else {
        tracing::warn!(
            vendor_id,
            zone = %vendor.zone,
            transaction_id = txn.id,
            "No shipper available, order not placed"
        );
        return Err(AppError::new(ErrorCode::NoShipperAvailable)
            .with_detail("zone", vendor.zone.clone())
            .into());
    };

    let order = Order {
        id: snowflake_id(),
        order_code: generate_code(),
        customer_id,
        vendor_id,
        transaction_id: txn.id,
        items,
        total_amount,
        final_amount: total_amount - txn.discount_amount,
        status: OrderStatus::Pending,
        delivery_id: shipper.id,
        ready_time_minutes: None,
        notes: None,
        created_at: now,
        updated_at: now,
    };
    tx.insert_order(&order).await?;
    ledger::attach_order(tx.as_mut(), txn.id, order.id).await?;
    tx.clear_cart(customer_id).await?;
    tx.append_customer_order(customer_id, order.id).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        order_code = %order.order_code,
        customer_id,
        vendor_id,
        shipper_id = shipper.id,
        total = %order.total_amount,
        final_amount = %order.final_amount,
        "Order placed"
    );
    Ok(order)
}

/// Orders in the customer's history
pub async fn customer_orders(store: &dyn Store, customer_id: i64) -> ServiceResult<Vec<Order>> {
    Ok(store.orders_for_customer(customer_id).await?)
}

/// One order from the customer's history
pub async fn customer_order(
    store: &dyn Store,
    customer_id: i64,
    order_id: i64,
) -> ServiceResult<Order> {
    store
        .find_customer_order(customer_id, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).into())
}
