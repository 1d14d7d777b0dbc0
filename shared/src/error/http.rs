//! HTTP status mapping

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCategory {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredential => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict | Self::InvalidState => StatusCode::CONFLICT,
            Self::ValidationFailed | Self::Expired => StatusCode::BAD_REQUEST,
            Self::AssignmentFailed => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorCode {
    /// Status for this code; the category decides except where a code is a
    /// plain client mistake rather than a conflict
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::PermissionDenied | Self::RoleRequired => StatusCode::FORBIDDEN,
            Self::PromoInactive | Self::OrderEmpty => StatusCode::BAD_REQUEST,
            _ => self.category().http_status(),
        }
    }
}
