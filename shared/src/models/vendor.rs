//! Vendor Model

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Vendor (restaurant) account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub owner_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(skip_serializing, default)]
    pub salt: String,
    pub phone: String,
    pub address: String,
    /// Delivery zone (postal-code style key)
    pub zone: String,
    pub lat: f64,
    pub lng: f64,
    pub service_available: bool,
    pub rating: f64,
}

impl Vendor {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}
