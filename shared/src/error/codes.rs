//! Numeric error codes
//!
//! The thousands digit names the area: 1 auth, 2 permission, 3 account,
//! 4 order, 5 payment, 6 catalog, 7 delivery, 9 system. Codes below 1000
//! are not tied to an area.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code carried in every error body.
///
/// Serialized as a bare `u16` so clients can switch on it without parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    /// Request body or parameters are malformed
    ValidationFailed = 2,
    /// Generic missing resource
    NotFound = 3,
    /// Unique key already taken
    AlreadyExists = 4,

    NotAuthenticated = 1001,
    /// Wrong password for a known account
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,

    PermissionDenied = 2001,
    /// Token belongs to another role
    RoleRequired = 2002,

    CustomerNotFound = 3001,
    VendorNotFound = 3002,
    ShipperNotFound = 3003,
    AlreadyVerified = 3004,
    VerificationCodeExpired = 3013,
    /// Code mismatch, or no code was ever issued
    VerificationCodeInvalid = 3014,

    OrderNotFound = 4001,
    /// No requested line resolved to an existing food
    OrderEmpty = 4007,
    /// Requested status is not a successor of the current one
    InvalidStatusTransition = 4008,

    TransactionNotFound = 5101,
    /// Transaction was already consumed by an order
    TransactionNotOpen = 5102,
    InvalidAmount = 5103,
    PromoNotFound = 5201,
    PromoInactive = 5202,

    FoodNotFound = 6001,

    /// No verified, available shipper in the vendor's zone
    NoShipperAvailable = 7001,

    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Every code, in numeric order
    pub const ALL: [ErrorCode; 27] = [
        Self::ValidationFailed,
        Self::NotFound,
        Self::AlreadyExists,
        Self::NotAuthenticated,
        Self::InvalidCredentials,
        Self::TokenExpired,
        Self::TokenInvalid,
        Self::PermissionDenied,
        Self::RoleRequired,
        Self::CustomerNotFound,
        Self::VendorNotFound,
        Self::ShipperNotFound,
        Self::AlreadyVerified,
        Self::VerificationCodeExpired,
        Self::VerificationCodeInvalid,
        Self::OrderNotFound,
        Self::OrderEmpty,
        Self::InvalidStatusTransition,
        Self::TransactionNotFound,
        Self::TransactionNotOpen,
        Self::InvalidAmount,
        Self::PromoNotFound,
        Self::PromoInactive,
        Self::FoodNotFound,
        Self::NoShipperAvailable,
        Self::InternalError,
        Self::DatabaseError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default client-facing message
    pub const fn message(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::NotAuthenticated => "Unauthorized",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Authentication token has expired",
            Self::TokenInvalid => "Authentication token is invalid",
            Self::PermissionDenied => "Permission denied",
            Self::RoleRequired => "Specific role is required",
            Self::CustomerNotFound => "Customer not found",
            Self::VendorNotFound => "Vendor not found",
            Self::ShipperNotFound => "Shipper not found",
            Self::AlreadyVerified => "Account already verified",
            Self::VerificationCodeExpired => "Verification code has expired",
            Self::VerificationCodeInvalid => "Invalid verification code",
            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order is empty",
            Self::InvalidStatusTransition => "Order status transition is not allowed",
            Self::TransactionNotFound => "Transaction not found",
            Self::TransactionNotOpen => "Transaction is not open",
            Self::InvalidAmount => "Invalid amount",
            Self::PromoNotFound => "Promo not found",
            Self::PromoInactive => "Promo is not active",
            Self::FoodNotFound => "Food not found",
            Self::NoShipperAvailable => "No shipper available for delivery",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A `u16` that is not one of [`ErrorCode::ALL`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}
