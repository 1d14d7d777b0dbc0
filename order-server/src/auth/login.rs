//! Email/password login for customers, vendors and shippers

use serde::Serialize;
use shared::error::{AppError, ErrorCode};

use super::credential;
use super::identity::{Principal, Role, create_token};
use crate::db::Store;
use crate::error::ServiceResult;

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub verified: bool,
    pub email: String,
}

/// Credential material of any account kind
struct Account {
    id: i64,
    email: String,
    salt: String,
    password_hash: String,
    verified: bool,
}

async fn find_account(store: &dyn Store, role: Role, email: &str) -> ServiceResult<Account> {
    let account = match role {
        Role::Customer => store.find_customer_by_email(email).await?.map(|c| Account {
            id: c.id,
            email: c.email,
            salt: c.salt,
            password_hash: c.password_hash,
            verified: c.verified,
        }),
        Role::Vendor => store.find_vendor_by_email(email).await?.map(|v| Account {
            id: v.id,
            email: v.email,
            salt: v.salt,
            password_hash: v.password_hash,
            verified: true,
        }),
        Role::Shipper => store.find_shipper_by_email(email).await?.map(|s| Account {
            id: s.id,
            email: s.email,
            salt: s.salt,
            password_hash: s.password_hash,
            verified: s.verified,
        }),
        Role::Admin => return Err(AppError::forbidden("Admin accounts cannot log in").into()),
    };

    let not_found = match role {
        Role::Customer => ErrorCode::CustomerNotFound,
        Role::Vendor => ErrorCode::VendorNotFound,
        _ => ErrorCode::ShipperNotFound,
    };
    account.ok_or_else(|| AppError::new(not_found).into())
}

/// Check credentials and mint a token
pub async fn login(
    store: &dyn Store,
    role: Role,
    email: &str,
    password: &str,
    jwt_secret: &str,
    expiry_hours: i64,
) -> ServiceResult<LoginResponse> {
    let email = email.trim().to_lowercase();
    let account = find_account(store, role, &email).await?;

    if !credential::verify(password, &account.salt, &account.password_hash) {
        tracing::info!(role = role.as_str(), email = %email, "Login rejected");
        return Err(AppError::invalid_credentials().into());
    }

    let principal = Principal {
        id: account.id,
        role,
        email: account.email,
        verified: account.verified,
    };
    let token = token_for(&principal, jwt_secret, expiry_hours)?;

    tracing::info!(role = role.as_str(), account_id = principal.id, "Login succeeded");
    Ok(LoginResponse {
        token,
        verified: principal.verified,
        email: principal.email,
    })
}

/// Mint a token, mapping signing failures to an internal error
pub fn token_for(principal: &Principal, jwt_secret: &str, expiry_hours: i64) -> ServiceResult<String> {
    create_token(principal, jwt_secret, expiry_hours).map_err(|e| {
        tracing::error!(error = %e, "Failed to sign token");
        AppError::internal("Failed to sign token").into()
    })
}
