//! Shared types for the food-ordering backend
//!
//! Domain models, the error system and id helpers used by `order-server`
//! and by clients that decode its responses.

pub mod error;
pub mod models;
pub mod util;
