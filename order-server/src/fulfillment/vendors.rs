//! Vendor service availability

use shared::error::{AppError, ErrorCode};
use shared::models::Vendor;

use crate::db::Store;
use crate::error::ServiceResult;

/// Flip whether the vendor is currently taking orders
pub async fn toggle_service(store: &dyn Store, vendor_id: i64) -> ServiceResult<Vendor> {
    let vendor = store
        .toggle_vendor_service(vendor_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::VendorNotFound).with_detail("vendor_id", vendor_id)
        })?;
    tracing::info!(
        vendor_id,
        service_available = vendor.service_available,
        "Vendor service toggled"
    );
    Ok(vendor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fulfillment::fixtures::{self, VENDOR_ID};

    #[tokio::test]
    async fn test_toggle_flips_each_call() {
        let store = fixtures::seeded_store().await;
        let before = store.find_vendor(VENDOR_ID).await.unwrap().unwrap();

        let once = toggle_service(&store, VENDOR_ID).await.unwrap();
        assert_eq!(once.service_available, !before.service_available);
        let twice = toggle_service(&store, VENDOR_ID).await.unwrap();
        assert_eq!(twice.service_available, before.service_available);

        let stored = store.find_vendor(VENDOR_ID).await.unwrap().unwrap();
        assert_eq!(stored.service_available, before.service_available);
    }

    #[tokio::test]
    async fn test_toggle_unknown_vendor() {
        let store = fixtures::seeded_store().await;
        let err = toggle_service(&store, 9_999).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::VendorNotFound);
    }
}
