// src/handlers/payment.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::payment::CheckoutRequest,
    services::payment::{CheckoutContext, PaymentGateway},
    utils::{extract::AppJson, jwt::Claims},
};

/// Starts a hosted checkout for a course and returns the redirect URL.
pub async fn create_checkout_session(
    State(payments): State<Arc<dyn PaymentGateway>>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let ctx = CheckoutContext {
        user_id: claims.user_id()?,
        client_url: config.client_url.clone(),
    };

    let session = payments
        .create_checkout_session(&ctx, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Checkout session failed for course {}: {}", payload.course_id, e);
            AppError::InternalServerError("Failed to create checkout session.".to_string())
        })?;

    Ok(Json(json!({ "url": session.url })))
}
