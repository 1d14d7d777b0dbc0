//! Data models
//!
//! Shared between order-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps Unix millis.

pub mod customer;
pub mod food;
pub mod geo;
pub mod order;
pub mod promo;
pub mod shipper;
pub mod transaction;
pub mod vendor;

// Re-exports
pub use customer::*;
pub use food::*;
pub use geo::*;
pub use order::*;
pub use promo::*;
pub use shipper::*;
pub use transaction::*;
pub use vendor::*;
