use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CartSummary, Shopper};
use super::service::{CheckoutVerdict, MinimumOrderService};
use super::settings::SettingsInput;
use super::store::SettingsStore;
use crate::error::AppError;

/// Cart and shopper as reported by the storefront for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub cart: CartSummary,
    #[serde(default)]
    pub shopper: Shopper,
}

/// Router builder exposing the cart, checkout and admin settings endpoints.
pub fn checkout_router<S>(service: Arc<MinimumOrderService<S>>) -> Router
where
    S: SettingsStore + 'static,
{
    Router::new()
        .route("/api/v1/checkout/cart", post(cart_handler::<S>))
        .route("/api/v1/checkout/validate", post(validate_handler::<S>))
        .route("/api/v1/checkout/banner", post(banner_handler::<S>))
        .route(
            "/api/v1/settings",
            get(settings_handler::<S>).put(update_settings_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn cart_handler<S>(
    State(service): State<Arc<MinimumOrderService<S>>>,
    axum::Json(request): axum::Json<CheckoutRequest>,
) -> Result<Response, AppError>
where
    S: SettingsStore + 'static,
{
    let view = service.on_cart_view(&request.cart, &request.shopper)?;
    Ok((StatusCode::OK, axum::Json(view)).into_response())
}

pub(crate) async fn validate_handler<S>(
    State(service): State<Arc<MinimumOrderService<S>>>,
    axum::Json(request): axum::Json<CheckoutRequest>,
) -> Result<Response, AppError>
where
    S: SettingsStore + 'static,
{
    let response = match service.on_checkout_validate(&request.cart, &request.shopper)? {
        CheckoutVerdict::Allowed { decision } => {
            let payload = json!({
                "status": "allowed",
                "decision": decision,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        CheckoutVerdict::Blocked { decision, message } => {
            let payload = json!({
                "status": "blocked",
                "error": message,
                "decision": decision,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    };
    Ok(response)
}

pub(crate) async fn banner_handler<S>(
    State(service): State<Arc<MinimumOrderService<S>>>,
    axum::Json(request): axum::Json<CheckoutRequest>,
) -> Result<Response, AppError>
where
    S: SettingsStore + 'static,
{
    let banner = service.banner(&request.cart, &request.shopper)?;
    Ok((StatusCode::OK, axum::Json(json!({ "banner": banner }))).into_response())
}

pub(crate) async fn settings_handler<S>(
    State(service): State<Arc<MinimumOrderService<S>>>,
) -> Result<Response, AppError>
where
    S: SettingsStore + 'static,
{
    let settings = service.settings()?;
    Ok((StatusCode::OK, axum::Json(settings)).into_response())
}

pub(crate) async fn update_settings_handler<S>(
    State(service): State<Arc<MinimumOrderService<S>>>,
    axum::Json(input): axum::Json<SettingsInput>,
) -> Result<Response, AppError>
where
    S: SettingsStore + 'static,
{
    let settings = service.update_settings(input)?;
    Ok((StatusCode::OK, axum::Json(settings)).into_response())
}
