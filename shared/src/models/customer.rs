//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer account
///
/// Credential material and the pending one-time code never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(skip_serializing, default)]
    pub salt: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub verified: bool,
    /// Pending one-time code
    #[serde(skip_serializing, default)]
    pub otp: Option<String>,
    /// Expiry of the pending code (Unix millis)
    #[serde(skip_serializing, default)]
    pub otp_expires_at: Option<i64>,
    pub lat: f64,
    pub lng: f64,
}

/// One line of a customer's cart, unique per food
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLine {
    pub food_id: i64,
    pub quantity: i32,
}
