//! Vendor routes: login, service toggle, order lifecycle and promos

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use axum::{Extension, Json, Router, middleware};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{Order, OrderStatus, Promo, PromoRequirement, PromoScope, Vendor};
use validator::Validate;

use super::ValidJson;
use super::customer::LoginRequest;
use crate::auth::login::{self, LoginResponse};
use crate::auth::{Principal, Role, vendor_auth};
use crate::error::ServiceResult;
use crate::fulfillment::lifecycle::{self, ProcessOrder};
use crate::fulfillment::promo::{self, PromoDraft};
use crate::fulfillment::vendors;
use crate::state::AppState;
use crate::util::now_millis;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/service", patch(toggle_service))
        .route("/orders", get(list_orders))
        .route("/order/{id}", get(get_order))
        .route("/order/{id}/process", put(process_order))
        .route("/promo", post(create_promo))
        .route("/promos", get(list_promos))
        .route("/promo/{id}", put(update_promo))
        .route_layer(middleware::from_fn_with_state(state, vendor_auth));

    Router::new().route("/login", post(login)).merge(protected)
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ServiceResult<Json<LoginResponse>> {
    let resp = login::login(
        state.store.as_ref(),
        Role::Vendor,
        &req.email,
        &req.password,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )
    .await?;
    Ok(Json(resp))
}

/// Flip whether the vendor is taking orders
pub async fn toggle_service(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ServiceResult<Json<Vendor>> {
    Ok(Json(
        vendors::toggle_service(state.store.as_ref(), principal.id).await?,
    ))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ServiceResult<Json<Vec<Order>>> {
    Ok(Json(
        lifecycle::vendor_orders(state.store.as_ref(), principal.id).await?,
    ))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<Order>> {
    Ok(Json(
        lifecycle::vendor_order(state.store.as_ref(), principal.id, id).await?,
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProcessRequest {
    pub status: OrderStatus,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 1440))]
    pub ready_time_minutes: Option<i32>,
}

pub async fn process_order(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    ValidJson(req): ValidJson<ProcessRequest>,
) -> ServiceResult<Json<Order>> {
    let action = ProcessOrder {
        status: req.status,
        notes: req.notes,
        ready_time_minutes: req.ready_time_minutes,
    };
    let order = lifecycle::advance(
        state.store.as_ref(),
        principal.id,
        id,
        action,
        now_millis(),
    )
    .await?;
    Ok(Json(order))
}

/// Full promo body, used for both create and update
#[derive(Debug, Deserialize, Validate)]
pub struct PromoRequest {
    #[validate(length(min = 1, max = 32, message = "code must be 1-32 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    pub scope: PromoScope,
    pub requirement: PromoRequirement,
    #[serde(default)]
    pub minimum_order_value: Decimal,
    pub discount_amount: Decimal,
    #[serde(default)]
    pub starts_at: Option<i64>,
    #[serde(default)]
    pub ends_at: Option<i64>,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub active: Option<bool>,
}

impl From<PromoRequest> for PromoDraft {
    fn from(req: PromoRequest) -> Self {
        PromoDraft {
            code: req.code,
            title: req.title,
            description: req.description,
            scope: req.scope,
            requirement: req.requirement,
            minimum_order_value: req.minimum_order_value,
            discount_amount: req.discount_amount,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            zone: req.zone,
            active: req.active.unwrap_or(true),
        }
    }
}

pub async fn create_promo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidJson(req): ValidJson<PromoRequest>,
) -> ServiceResult<(StatusCode, Json<Promo>)> {
    let promo = promo::create_for_vendor(state.store.as_ref(), principal.id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(promo)))
}

pub async fn list_promos(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ServiceResult<Json<Vec<Promo>>> {
    Ok(Json(
        promo::list_for_vendor(state.store.as_ref(), principal.id).await?,
    ))
}

pub async fn update_promo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    ValidJson(req): ValidJson<PromoRequest>,
) -> ServiceResult<Json<Promo>> {
    let promo =
        promo::update_for_vendor(state.store.as_ref(), principal.id, id, req.into()).await?;
    Ok(Json(promo))
}
