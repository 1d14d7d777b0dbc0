//! Transaction Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "transaction_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum TransactionStatus {
    /// Payment intent recorded, no order yet
    Open,
    /// Consumed by exactly one order
    Success,
}

/// Payment mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "payment_mode", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum PaymentMode {
    Cod,
    Card,
    Bank,
    Wallet,
}

/// Note stored on cash-on-delivery transactions
pub const COD_PAYMENT_NOTE: &str = "Payment is cash on delivery";

/// Recorded payment intent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    pub customer_id: i64,
    pub status: TransactionStatus,
    /// Amount the customer asked to pay before any promo
    pub requested_amount: Decimal,
    pub discount_amount: Decimal,
    /// Amount after the promo
    pub order_amount: Decimal,
    pub promo_id: Option<i64>,
    pub payment_mode: PaymentMode,
    pub payment_note: String,
    /// Set once an order consumes the transaction
    pub order_id: Option<i64>,
    pub created_at: i64,
}

impl Transaction {
    pub fn is_open(&self) -> bool {
        self.status == TransactionStatus::Open
    }
}
