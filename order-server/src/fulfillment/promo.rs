//! Promo evaluation and vendor promo management
//!
//! Only the `active` flag gates a promo. Scope, payment requirement, validity
//! window and minimum order value are stored but not enforced, and the
//! discount has no floor.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Promo, PromoRequirement, PromoScope};

use crate::db::Store;
use crate::error::ServiceResult;
use crate::util::snowflake_id;

/// Discounted amount for an already loaded promo
pub fn apply(promo: &Promo, requested_total: Decimal) -> Result<Decimal, AppError> {
    if !promo.active {
        return Err(AppError::new(ErrorCode::PromoInactive).with_detail("promo_id", promo.id));
    }
    Ok(requested_total - promo.discount_amount)
}

async fn load(store: &dyn Store, promo_id: i64) -> ServiceResult<Promo> {
    store
        .find_promo(promo_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PromoNotFound).into())
}

/// Discounted amount for `promo_id`
pub async fn evaluate(
    store: &dyn Store,
    promo_id: i64,
    requested_total: Decimal,
) -> ServiceResult<Decimal> {
    let promo = load(store, promo_id).await?;
    Ok(apply(&promo, requested_total)?)
}

/// The promo, if it can currently be applied
pub async fn verify(store: &dyn Store, promo_id: i64) -> ServiceResult<Promo> {
    let promo = load(store, promo_id).await?;
    if !promo.active {
        return Err(AppError::new(ErrorCode::PromoInactive).into());
    }
    Ok(promo)
}

/// Every promo field a vendor sets on create and on update
#[derive(Debug, Clone)]
pub struct PromoDraft {
    pub code: String,
    pub title: String,
    pub description: String,
    pub scope: PromoScope,
    pub requirement: PromoRequirement,
    pub minimum_order_value: Decimal,
    pub discount_amount: Decimal,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub zone: String,
    pub active: bool,
}

impl PromoDraft {
    fn check(&self) -> Result<(), AppError> {
        for (field, amount) in [
            ("discount_amount", self.discount_amount),
            ("minimum_order_value", self.minimum_order_value),
        ] {
            if amount < Decimal::ZERO {
                return Err(AppError::new(ErrorCode::InvalidAmount).with_detail("field", field));
            }
        }
        if matches!((self.starts_at, self.ends_at), (Some(start), Some(end)) if start > end) {
            return Err(AppError::validation("starts_at must not be after ends_at")
                .with_detail("field", "starts_at"));
        }
        Ok(())
    }

    fn into_promo(self, id: i64, vendor_ids: Vec<i64>) -> Promo {
        Promo {
            id,
            code: self.code,
            title: self.title,
            description: self.description,
            scope: self.scope,
            requirement: self.requirement,
            minimum_order_value: self.minimum_order_value,
            discount_amount: self.discount_amount,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            zone: self.zone,
            active: self.active,
            vendor_ids,
        }
    }
}

/// Create a promo owned by `vendor_id`
pub async fn create_for_vendor(
    store: &dyn Store,
    vendor_id: i64,
    draft: PromoDraft,
) -> ServiceResult<Promo> {
    draft.check()?;
    let promo = draft.into_promo(snowflake_id(), vec![vendor_id]);
    store.create_promo(&promo).await?;
    tracing::info!(promo_id = promo.id, vendor_id, code = %promo.code, "Promo created");
    Ok(promo)
}

/// GENERIC promos plus the vendor's own
pub async fn list_for_vendor(store: &dyn Store, vendor_id: i64) -> ServiceResult<Vec<Promo>> {
    Ok(store.promos_for_vendor(vendor_id).await?)
}

/// Overwrite all fields of a promo the vendor is listed on
///
/// Promos that do not list the vendor are reported as missing.
pub async fn update_for_vendor(
    store: &dyn Store,
    vendor_id: i64,
    promo_id: i64,
    draft: PromoDraft,
) -> ServiceResult<Promo> {
    let current = load(store, promo_id).await?;
    if !current.vendor_ids.contains(&vendor_id) {
        return Err(AppError::new(ErrorCode::PromoNotFound).into());
    }
    draft.check()?;
    let promo = draft.into_promo(promo_id, current.vendor_ids);
    let updated = store
        .replace_promo(&promo)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PromoNotFound))?;
    tracing::info!(promo_id, vendor_id, "Promo updated");
    Ok(updated)
}
