//! HTTP routes for order-server
//!
//! | Prefix | Auth |
//! |--------|------|
//! | `/health` | none |
//! | `/customer` | customer token (except `/login`) |
//! | `/vendor` | vendor token (except `/login`) |
//! | `/shipper` | shipper token (except `/login`) |
//! | `/admin` | admin token |

pub mod admin;
pub mod customer;
pub mod health;
pub mod shipper;
pub mod vendor;

use axum::extract::{FromRequest, Request};
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use validator::Validate;

use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/customer", customer::router(state.clone()))
        .nest("/vendor", vendor::router(state.clone()))
        .nest("/shipper", shipper::router(state.clone()))
        .nest("/admin", admin::router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JSON body that is deserialized and validated before the handler runs.
///
/// Both failures render as `ValidationFailed` with the usual error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

fn validation_error(errors: validator::ValidationErrors) -> AppError {
    let mut err = AppError::validation("Request validation failed");
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        err = err.with_detail(field.to_string(), messages);
    }
    err
}
