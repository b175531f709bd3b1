use std::sync::Arc;

use crate::{config::Config, services::payment::PaymentGateway};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub payments: Arc<dyn PaymentGateway>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn PaymentGateway> {
    fn from_ref(state: &AppState) -> Self {
        state.payments.clone()
    }
}
