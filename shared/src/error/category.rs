//! Failure taxonomy
//!
//! Every [`ErrorCode`] belongs to one category; the category decides the
//! HTTP status (see `http.rs`) and whether the error is logged.

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Missing or rejected principal
    Unauthorized,
    NotFound,
    /// Duplicate or already-done
    Conflict,
    ValidationFailed,
    /// Wrong password or one-time code
    InvalidCredential,
    Expired,
    /// Entity is not in a state that allows the operation
    InvalidState,
    /// Nobody could take the delivery
    AssignmentFailed,
    InternalFailure,
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        use ErrorCategory::*;
        match self {
            Self::NotAuthenticated
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::PermissionDenied
            | Self::RoleRequired => Unauthorized,

            Self::NotFound
            | Self::CustomerNotFound
            | Self::VendorNotFound
            | Self::ShipperNotFound
            | Self::FoodNotFound
            | Self::PromoNotFound
            | Self::TransactionNotFound
            | Self::OrderNotFound => NotFound,

            Self::AlreadyExists | Self::AlreadyVerified => Conflict,
            Self::ValidationFailed | Self::InvalidAmount => ValidationFailed,
            Self::InvalidCredentials | Self::VerificationCodeInvalid => InvalidCredential,
            Self::VerificationCodeExpired => Expired,

            Self::TransactionNotOpen
            | Self::InvalidStatusTransition
            | Self::PromoInactive
            | Self::OrderEmpty => InvalidState,

            Self::NoShipperAvailable => AssignmentFailed,
            Self::InternalError | Self::DatabaseError => InternalFailure,
        }
    }
}
