//! Bearer-token identity
//!
//! Tokens are HS256 JWTs. A role middleware validates the token, checks the
//! role and inserts the [`Principal`] into request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

/// Account kind carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Vendor,
    Shipper,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Vendor => "vendor",
            Role::Shipper => "shipper",
            Role::Admin => "admin",
        }
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    pub role: Role,
    pub email: String,
    pub verified: bool,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated caller, passed explicitly into service calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub role: Role,
    pub email: String,
    pub verified: bool,
}

impl TryFrom<Claims> for Principal {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| AppError::with_message(ErrorCode::TokenInvalid, "Malformed token subject"))?;
        Ok(Self {
            id,
            role: claims.role,
            email: claims.email,
            verified: claims.verified,
        })
    }
}

/// Create a signed token for `principal`
pub fn create_token(
    principal: &Principal,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: principal.id.to_string(),
        role: principal.role,
        email: principal.email.clone(),
        verified: principal.verified,
        exp: (now + chrono::Duration::hours(expiry_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate a token and extract the principal
pub fn decode_token(token: &str, secret: &str) -> Result<Principal, AppError> {
    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::new(ErrorCode::TokenExpired),
            _ => AppError::new(ErrorCode::TokenInvalid),
        }
    })?;

    Principal::try_from(token_data.claims)
}

async fn authenticate(
    state: &AppState,
    role: Role,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::unauthorized)?
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::TokenInvalid, "Invalid Authorization format")
        })?;

    let principal = decode_token(token, &state.jwt_secret)?;
    if principal.role != role {
        tracing::debug!(
            expected = role.as_str(),
            actual = principal.role.as_str(),
            "Role mismatch"
        );
        return Err(AppError::new(ErrorCode::RoleRequired).with_detail("role", role.as_str()));
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Requires a customer token
pub async fn customer_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(&state, Role::Customer, request, next).await
}

/// Requires a vendor token
pub async fn vendor_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(&state, Role::Vendor, request, next).await
}

/// Requires a shipper token
pub async fn shipper_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(&state, Role::Shipper, request, next).await
}

/// Requires an admin token (minted by the operator, there is no admin login)
pub async fn admin_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(&state, Role::Admin, request, next).await
}
