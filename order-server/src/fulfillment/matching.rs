//! Shipper matching
//!
//! Picks the nearest verified, available shipper in the vendor's zone. There
//! is no reservation: the chosen shipper stays available for other orders.

use async_trait::async_trait;
use shared::models::{GeoPoint, Shipper, Vendor};

use crate::db::{RepoResult, StoreTx};

/// Delivery assignment policy
#[async_trait]
pub trait ShipperMatcher: Send + Sync {
    /// Shipper for an order from `vendor`, read through the open unit of work
    async fn find_nearest(
        &self,
        tx: &mut dyn StoreTx,
        vendor: &Vendor,
    ) -> RepoResult<Option<Shipper>>;
}

/// Euclidean nearest candidate, first one wins ties
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestShipper;

#[async_trait]
impl ShipperMatcher for NearestShipper {
    async fn find_nearest(
        &self,
        tx: &mut dyn StoreTx,
        vendor: &Vendor,
    ) -> RepoResult<Option<Shipper>> {
        let candidates = tx.available_shippers(&vendor.zone).await?;
        Ok(nearest(vendor.location(), &vendor.zone, &candidates).cloned())
    }
}

/// Nearest eligible shipper to `origin`; `None` when nobody qualifies
pub fn nearest<'a>(origin: GeoPoint, zone: &str, candidates: &'a [Shipper]) -> Option<&'a Shipper> {
    let mut best: Option<(&Shipper, f64)> = None;
    for shipper in candidates.iter().filter(|s| s.can_deliver_in(zone)) {
        let distance = origin.distance_to(&shipper.location());
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((shipper, distance)),
        }
    }
    best.map(|(shipper, _)| shipper)
}
