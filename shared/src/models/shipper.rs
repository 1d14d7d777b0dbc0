//! Shipper Model

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Delivery shipper account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shipper {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(skip_serializing, default)]
    pub salt: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub zone: String,
    /// Set by an admin
    pub verified: bool,
    pub is_available: bool,
    pub lat: f64,
    pub lng: f64,
}

impl Shipper {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Eligible for a delivery in `zone`
    pub fn can_deliver_in(&self, zone: &str) -> bool {
        self.verified && self.is_available && self.zone == zone
    }
}
