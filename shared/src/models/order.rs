//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Food;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum OrderStatus {
    Pending,
    Accepted,
    Rejected,
    InProgress,
    Ready,
    Delivered,
}

impl OrderStatus {
    /// Statuses reachable from `self` in one vendor action
    pub fn successors(&self) -> &'static [OrderStatus] {
        match self {
            Self::Pending => &[Self::Accepted, Self::Rejected],
            Self::Accepted => &[Self::InProgress],
            Self::InProgress => &[Self::Ready],
            Self::Ready => &[Self::Delivered],
            Self::Rejected | Self::Delivered => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.successors().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

/// Snapshot of a food at order time with its quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub food: Food,
    pub quantity: i32,
}

impl OrderLineItem {
    pub fn line_total(&self) -> Decimal {
        self.food.price * Decimal::from(self.quantity)
    }
}

/// Placed order, never deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// 6-digit display code, not unique
    pub order_code: String,
    pub customer_id: i64,
    pub vendor_id: i64,
    pub transaction_id: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderLineItem>,
    pub total_amount: Decimal,
    pub final_amount: Decimal,
    pub status: OrderStatus,
    /// Assigned shipper
    pub delivery_id: i64,
    pub ready_time_minutes: Option<i32>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
