//! One-time code verification
//!
//! `Unverified -> Pending(code, expiry) -> Verified`. Re-issuing overwrites
//! the pending code; once verified the account never goes back.

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::Customer;

use crate::db::Store;
use crate::error::ServiceResult;
use crate::notify::{self, Notifier};
use crate::util::generate_code;

/// Lifetime of an issued code (5 minutes)
pub const CODE_TTL_MS: i64 = 5 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: i64,
}

/// Fresh 6-digit code valid until `now + CODE_TTL_MS`
pub fn issue(now: i64) -> IssuedCode {
    IssuedCode {
        code: generate_code(),
        expires_at: now + CODE_TTL_MS,
    }
}

/// Check `candidate` against the pending code.
///
/// A mismatch is reported before expiry; the code is expired from
/// `expires_at` on.
pub fn check(
    candidate: &str,
    now: i64,
    stored_code: Option<&str>,
    expires_at: Option<i64>,
) -> Result<(), AppError> {
    let (Some(code), Some(expires_at)) = (stored_code, expires_at) else {
        return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
    };
    if code != candidate {
        return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
    }
    if now >= expires_at {
        return Err(AppError::new(ErrorCode::VerificationCodeExpired));
    }
    Ok(())
}

async fn load_customer(store: &dyn Store, customer_id: i64) -> ServiceResult<Customer> {
    store
        .find_customer(customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound).into())
}

/// Issue (or re-issue) a code for an unverified customer and send it to
/// their phone in the background
pub async fn request_code(
    store: &dyn Store,
    notifier: &Arc<dyn Notifier>,
    customer_id: i64,
    now: i64,
) -> ServiceResult<IssuedCode> {
    let customer = load_customer(store, customer_id).await?;
    if customer.verified {
        return Err(AppError::new(ErrorCode::AlreadyVerified).into());
    }

    let issued = issue(now);
    store
        .save_otp(customer.id, &issued.code, issued.expires_at)
        .await?;
    notify::dispatch_code(notifier.clone(), customer.phone, issued.code.clone());

    tracing::info!(customer_id, expires_at = issued.expires_at, "One-time code issued");
    Ok(issued)
}

/// Verify the submitted code; on success the customer is verified for good
pub async fn verify_code(
    store: &dyn Store,
    customer_id: i64,
    candidate: &str,
    now: i64,
) -> ServiceResult<Customer> {
    let mut customer = load_customer(store, customer_id).await?;
    if customer.verified {
        return Err(AppError::new(ErrorCode::AlreadyVerified).into());
    }

    check(
        candidate,
        now,
        customer.otp.as_deref(),
        customer.otp_expires_at,
    )?;

    store.mark_customer_verified(customer.id).await?;
    customer.verified = true;
    customer.otp = None;
    customer.otp_expires_at = None;

    tracing::info!(customer_id, "Customer verified");
    Ok(customer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fulfillment::fixtures;
    use crate::notify::LogNotifier;

    const T: i64 = 1_700_000_000_000;

    #[test]
    fn test_issue_sets_five_minute_expiry() {
        let issued = issue(T);
        assert_eq!(issued.expires_at, T + 300_000);
        assert_eq!(issued.code.len(), 6);
    }

    #[test]
    fn test_check_boundaries() {
        let exp = T + CODE_TTL_MS;
        assert!(check("123456", T, Some("123456"), Some(exp)).is_ok());
        assert!(check("123456", exp - 1, Some("123456"), Some(exp)).is_ok());

        let err = check("123456", exp, Some("123456"), Some(exp)).unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeExpired);
    }

    #[test]
    fn test_mismatch_reported_before_expiry() {
        let exp = T + CODE_TTL_MS;
        let err = check("000000", exp + 10, Some("123456"), Some(exp)).unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
    }

    #[test]
    fn test_no_pending_code_is_invalid() {
        let err = check("123456", T, None, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
    }

    #[tokio::test]
    async fn test_issue_then_verify_flow() {
        let store = fixtures::seeded_store().await;
        let mut unverified = fixtures::customer(1);
        unverified.verified = false;
        store.insert_customer(unverified).await;
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

        let first = request_code(&store, &notifier, 1, T).await.unwrap();
        let second = request_code(&store, &notifier, 1, T + 1_000).await.unwrap();
        let stored = store.find_customer(1).await.unwrap().unwrap();
        assert_eq!(stored.otp.as_deref(), Some(second.code.as_str()));
        assert_eq!(stored.otp_expires_at, Some(T + 1_000 + CODE_TTL_MS));

        if first.code != second.code {
            let err = verify_code(&store, 1, &first.code, T + 2_000).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::VerificationCodeInvalid);
        }

        let customer = verify_code(&store, 1, &second.code, T + 2_000).await.unwrap();
        assert!(customer.verified);

        let err = verify_code(&store, 1, &second.code, T + 3_000).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyVerified);
        let err = request_code(&store, &notifier, 1, T + 3_000).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyVerified);
    }

    #[tokio::test]
    async fn test_expired_code_leaves_customer_unverified() {
        let store = fixtures::seeded_store().await;
        let mut unverified = fixtures::customer(1);
        unverified.verified = false;
        store.insert_customer(unverified).await;
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

        let issued = request_code(&store, &notifier, 1, T).await.unwrap();
        let err = verify_code(&store, 1, &issued.code, T + CODE_TTL_MS)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::VerificationCodeExpired);
        assert!(!store.find_customer(1).await.unwrap().unwrap().verified);
    }
}
