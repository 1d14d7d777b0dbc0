//! Shared utility functions for order-server

pub use shared::util::{now_millis, snowflake_id};

/// Random 6-digit numeric code (one-time codes, order display codes)
pub fn generate_code() -> String {
    shared::util::numeric_code(6)
}
