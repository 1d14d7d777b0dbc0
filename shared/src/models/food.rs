//! Food Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog entry, read-only for the fulfillment pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Food {
    pub id: i64,
    pub vendor_id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub food_type: String,
    pub ready_time_minutes: i32,
    pub price: Decimal,
    pub rating: f64,
}
