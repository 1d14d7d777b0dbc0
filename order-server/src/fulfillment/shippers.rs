//! Shipper availability and admin verification

use shared::error::{AppError, ErrorCode};
use shared::models::{GeoPoint, Shipper};

use crate::db::Store;
use crate::error::ServiceResult;

fn not_found(shipper_id: i64) -> AppError {
    AppError::new(ErrorCode::ShipperNotFound).with_detail("shipper_id", shipper_id)
}

/// Toggle availability; the location changes only when both coordinates are given
pub async fn change_status(
    store: &dyn Store,
    shipper_id: i64,
    lat: Option<f64>,
    lng: Option<f64>,
) -> ServiceResult<Shipper> {
    let current = store
        .find_shipper(shipper_id)
        .await?
        .ok_or_else(|| not_found(shipper_id))?;

    let location = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
        _ => None,
    };
    let updated = store
        .update_shipper_status(shipper_id, !current.is_available, location)
        .await?
        .ok_or_else(|| not_found(shipper_id))?;

    tracing::info!(
        shipper_id,
        is_available = updated.is_available,
        "Shipper availability changed"
    );
    Ok(updated)
}

/// Admin: set the verified flag
pub async fn set_verified(
    store: &dyn Store,
    shipper_id: i64,
    verified: bool,
) -> ServiceResult<Shipper> {
    let shipper = store
        .set_shipper_verified(shipper_id, verified)
        .await?
        .ok_or_else(|| not_found(shipper_id))?;
    tracing::info!(shipper_id, verified, "Shipper verification updated");
    Ok(shipper)
}

pub async fn list(store: &dyn Store) -> ServiceResult<Vec<Shipper>> {
    Ok(store.list_shippers().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fulfillment::fixtures;

    #[tokio::test]
    async fn test_toggle_and_partial_location() {
        let store = fixtures::seeded_store().await;

        let s = change_status(&store, 300, Some(5.0), None).await.unwrap();
        assert!(!s.is_available);
        assert_eq!((s.lat, s.lng), (1.0, 1.0));

        let s = change_status(&store, 300, Some(5.0), Some(6.0)).await.unwrap();
        assert!(s.is_available);
        assert_eq!((s.lat, s.lng), (5.0, 6.0));
    }

    #[tokio::test]
    async fn test_unknown_shipper() {
        let store = fixtures::seeded_store().await;
        let err = change_status(&store, 1, None, None).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ShipperNotFound);
        let err = set_verified(&store, 1, true).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ShipperNotFound);
    }

    #[tokio::test]
    async fn test_set_verified() {
        let store = fixtures::seeded_store().await;
        let s = set_verified(&store, 300, false).await.unwrap();
        assert!(!s.verified);
        assert_eq!(list(&store).await.unwrap().len(), 1);
    }
}
