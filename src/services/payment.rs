// src/services/payment.rs

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::form_urlencoded;

use crate::{
    error::ServiceError,
    models::{
        UserId,
        payment::{CheckoutRequest, CheckoutSession},
    },
};

/// Per-call context for a checkout: who pays, and where the browser returns.
#[derive(Debug, Clone)]
pub struct CheckoutContext {
    pub user_id: UserId,
    pub client_url: String,
}

/// Creates hosted checkout sessions.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        ctx: &CheckoutContext,
        req: &CheckoutRequest,
    ) -> Result<CheckoutSession, ServiceError>;
}

/// Stripe Checkout over its REST API.
///
/// The secret key is attached to each request; the shared client carries no
/// default credentials.
#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: Option<String>,
}

impl StripeGateway {
    pub fn new(client: reqwest::Client, api_base: String, secret_key: Option<String>) -> Self {
        Self {
            client,
            api_base,
            secret_key,
        }
    }
}

/// Encodes the form body for `POST /v1/checkout/sessions`.
pub fn checkout_form(ctx: &CheckoutContext, req: &CheckoutRequest) -> String {
    let success_url = format!(
        "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
        ctx.client_url
    );
    let cancel_url = format!("{}/courses/{}", ctx.client_url, req.course_id);

    form_urlencoded::Serializer::new(String::new())
        .append_pair("payment_method_types[0]", "card")
        .append_pair("line_items[0][price_data][currency]", "usd")
        .append_pair("line_items[0][price_data][product_data][name]", &req.course_name)
        .append_pair(
            "line_items[0][price_data][unit_amount]",
            &req.unit_amount().to_string(),
        )
        .append_pair("line_items[0][quantity]", "1")
        .append_pair("mode", "payment")
        .append_pair("success_url", &success_url)
        .append_pair("cancel_url", &cancel_url)
        .append_pair("metadata[userId]", &ctx.user_id.to_string())
        .append_pair("metadata[courseId]", &req.course_id.to_string())
        .finish()
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        ctx: &CheckoutContext,
        req: &CheckoutRequest,
    ) -> Result<CheckoutSession, ServiceError> {
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or_else(|| ServiceError::DataAccess("payment gateway is not configured".into()))?;

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(secret_key)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(checkout_form(ctx, req))
            .send()
            .await
            .map_err(|e| ServiceError::DataAccess(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::DataAccess(format!(
                "checkout session request failed with status {}: {}",
                status, body
            )));
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| ServiceError::DataAccess(e.to_string()))
    }
}
