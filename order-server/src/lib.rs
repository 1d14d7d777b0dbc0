//! order-server: food-ordering fulfillment backend
//!
//! Customers fill a cart, open a payment transaction (optionally with a promo)
//! and place an order against it. Placement prices the lines, consumes the
//! transaction and assigns the nearest available shipper in one unit of work.
//! Vendors then drive the order through its lifecycle.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod fulfillment;
pub mod notify;
pub mod state;
pub mod util;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
