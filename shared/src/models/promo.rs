//! Promo Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who may use a promo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "promo_scope", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum PromoScope {
    Generic,
    Vendor,
}

/// Payment instrument a promo is tied to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "promo_requirement", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum PromoRequirement {
    Bank,
    Card,
    None,
}

/// Discount code
///
/// Scope, requirement, window and minimum are stored and exposed; only
/// `active` gates application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Promo {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: String,
    pub scope: PromoScope,
    pub requirement: PromoRequirement,
    pub minimum_order_value: Decimal,
    pub discount_amount: Decimal,
    /// Unix millis
    pub starts_at: Option<i64>,
    /// Unix millis
    pub ends_at: Option<i64>,
    pub zone: String,
    pub active: bool,
    #[serde(default)]
    pub vendor_ids: Vec<i64>,
}
