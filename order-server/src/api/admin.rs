//! Admin routes: shipper verification and transaction reads

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router, middleware};
use serde::Deserialize;
use shared::models::{Shipper, Transaction};
use validator::Validate;

use super::ValidJson;
use crate::auth::admin_auth;
use crate::error::ServiceResult;
use crate::fulfillment::{ledger, shippers};
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/shipper/verify", put(verify_shipper))
        .route("/shippers", get(list_shippers))
        .route("/transactions", get(list_transactions))
        .route("/transaction/{id}", get(get_transaction))
        .route_layer(middleware::from_fn_with_state(state, admin_auth))
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyShipperRequest {
    pub shipper_id: i64,
    pub verified: bool,
}

pub async fn verify_shipper(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<VerifyShipperRequest>,
) -> ServiceResult<Json<Shipper>> {
    let shipper = shippers::set_verified(state.store.as_ref(), req.shipper_id, req.verified).await?;
    Ok(Json(shipper))
}

pub async fn list_shippers(State(state): State<AppState>) -> ServiceResult<Json<Vec<Shipper>>> {
    Ok(Json(shippers::list(state.store.as_ref()).await?))
}

pub async fn list_transactions(
    State(state): State<AppState>,
) -> ServiceResult<Json<Vec<Transaction>>> {
    Ok(Json(ledger::list(state.store.as_ref()).await?))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<Transaction>> {
    Ok(Json(ledger::find(state.store.as_ref(), id).await?))
}
