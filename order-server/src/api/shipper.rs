//! Shipper routes: login and availability toggle

use axum::extract::State;
use axum::routing::{post, put};
use axum::{Extension, Json, Router, middleware};
use serde::Deserialize;
use shared::models::Shipper;
use validator::Validate;

use super::ValidJson;
use super::customer::LoginRequest;
use crate::auth::login::{self, LoginResponse};
use crate::auth::{Principal, Role, shipper_auth};
use crate::error::ServiceResult;
use crate::fulfillment::shippers;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/change-status", put(change_status))
        .route_layer(middleware::from_fn_with_state(state, shipper_auth));

    Router::new().route("/login", post(login)).merge(protected)
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ServiceResult<Json<LoginResponse>> {
    let resp = login::login(
        state.store.as_ref(),
        Role::Shipper,
        &req.email,
        &req.password,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )
    .await?;
    Ok(Json(resp))
}

/// Current position; ignored unless both coordinates are present
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ChangeStatusRequest {
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
}

pub async fn change_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidJson(req): ValidJson<ChangeStatusRequest>,
) -> ServiceResult<Json<Shipper>> {
    let shipper =
        shippers::change_status(state.store.as_ref(), principal.id, req.lat, req.lng).await?;
    Ok(Json(shipper))
}
