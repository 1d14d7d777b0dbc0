//! Error system shared by every crate
//!
//! [`ErrorCode`] is the stable numeric code, [`ErrorCategory`] its place in
//! the failure taxonomy (and so its HTTP status), [`AppError`] the value
//! handlers return and [`ErrorBody`] what goes over the wire.
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::PromoInactive).with_detail("promo_id", 7);
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.message, "Promo is not active");
//! assert_eq!(err.http_status().as_u16(), 400);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, ErrorBody};
