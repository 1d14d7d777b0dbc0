//! Customer routes
//!
//! | Path | Method | Handler |
//! |------|--------|---------|
//! | /login | POST | [`login`] |
//! | /verify | PATCH | [`verify`] |
//! | /otp | GET | [`request_otp`] |
//! | /cart | POST, GET, DELETE | [`upsert_cart`], [`get_cart`], [`clear_cart`] |
//! | /transaction | POST | [`open_transaction`] |
//! | /promo/verify/{id} | GET | [`verify_promo`] |
//! | /order | POST | [`place_order`] |
//! | /orders | GET | [`list_orders`] |
//! | /order/{id} | GET | [`get_order`] |

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Extension, Json, Router, middleware};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{CartLine, Order, PaymentMode, Promo, Transaction};
use validator::Validate;

use super::ValidJson;
use crate::auth::login::{self, LoginResponse};
use crate::auth::{Principal, Role, customer_auth};
use crate::error::ServiceResult;
use crate::fulfillment::assembler::{self, PlaceOrder};
use crate::fulfillment::ledger::{self, OpenTransaction};
use crate::fulfillment::{cart, otp, promo};
use crate::state::AppState;
use crate::util::now_millis;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/verify", patch(verify))
        .route("/otp", get(request_otp))
        .route("/cart", post(upsert_cart).get(get_cart).delete(clear_cart))
        .route("/transaction", post(open_transaction))
        .route("/promo/verify/{id}", get(verify_promo))
        .route("/order", post(place_order))
        .route("/orders", get(list_orders))
        .route("/order/{id}", get(get_order))
        .route_layer(middleware::from_fn_with_state(state, customer_auth));

    Router::new().route("/login", post(login)).merge(protected)
}

/// Email/password credentials, shared by every login route
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ServiceResult<Json<LoginResponse>> {
    let resp = login::login(
        state.store.as_ref(),
        Role::Customer,
        &req.email,
        &req.password,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )
    .await?;
    Ok(Json(resp))
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(length(equal = 6, message = "code must have 6 digits"))]
    pub code: String,
}

/// Submit the one-time code; answers with a token carrying `verified = true`
pub async fn verify(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidJson(req): ValidJson<VerifyRequest>,
) -> ServiceResult<Json<LoginResponse>> {
    let customer =
        otp::verify_code(state.store.as_ref(), principal.id, &req.code, now_millis()).await?;

    let principal = Principal {
        verified: customer.verified,
        ..principal
    };
    let token = login::token_for(&principal, &state.jwt_secret, state.jwt_expiry_hours)?;
    Ok(Json(LoginResponse {
        token,
        verified: principal.verified,
        email: principal.email,
    }))
}

#[derive(Debug, Serialize)]
pub struct OtpResponse {
    pub message: &'static str,
    pub expires_at: i64,
}

/// Issue a fresh code; the code itself only travels through the notifier
pub async fn request_otp(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ServiceResult<Json<OtpResponse>> {
    let issued =
        otp::request_code(state.store.as_ref(), &state.notifier, principal.id, now_millis())
            .await?;
    Ok(Json(OtpResponse {
        message: "Verification code sent",
        expires_at: issued.expires_at,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CartRequest {
    pub food_id: i64,
    /// Zero or less removes the line
    pub quantity: i32,
}

pub async fn upsert_cart(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidJson(req): ValidJson<CartRequest>,
) -> ServiceResult<Json<Vec<CartLine>>> {
    let line = CartLine {
        food_id: req.food_id,
        quantity: req.quantity,
    };
    let lines = cart::upsert_line(state.store.as_ref(), principal.id, line).await?;
    Ok(Json(lines))
}

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ServiceResult<Json<Vec<CartLine>>> {
    Ok(Json(cart::read(state.store.as_ref(), principal.id).await?))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ServiceResult<Json<Vec<CartLine>>> {
    cart::clear(state.store.as_ref(), principal.id).await?;
    Ok(Json(Vec::new()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransactionRequest {
    pub total_amount: Decimal,
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub promo_id: Option<i64>,
}

pub async fn open_transaction(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidJson(req): ValidJson<TransactionRequest>,
) -> ServiceResult<(StatusCode, Json<Transaction>)> {
    let input = OpenTransaction {
        total_amount: req.total_amount,
        payment_mode: req.payment_mode,
        promo_id: req.promo_id,
    };
    let txn = ledger::open(state.store.as_ref(), principal.id, input, now_millis()).await?;
    Ok((StatusCode::CREATED, Json(txn)))
}

pub async fn verify_promo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<Promo>> {
    Ok(Json(promo::verify(state.store.as_ref(), id).await?))
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderRequest {
    pub transaction_id: i64,
    /// Explicit lines; the stored cart is used when absent
    #[serde(default)]
    pub items: Option<Vec<CartLine>>,
}

pub async fn place_order(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidJson(req): ValidJson<OrderRequest>,
) -> ServiceResult<(StatusCode, Json<Order>)> {
    let request = PlaceOrder {
        transaction_id: req.transaction_id,
        items: req.items,
    };
    let order = assembler::assemble(
        state.store.as_ref(),
        state.matcher.as_ref(),
        principal.id,
        request,
        now_millis(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ServiceResult<Json<Vec<Order>>> {
    Ok(Json(
        assembler::customer_orders(state.store.as_ref(), principal.id).await?,
    ))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<Order>> {
    Ok(Json(
        assembler::customer_order(state.store.as_ref(), principal.id, id).await?,
    ))
}
