// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Price used when an instructor creates a course without one (in cents).
pub const DEFAULT_COURSE_PRICE_CENTS: i64 = 1999;

/// A question needs at least this many options to be answerable.
pub const MIN_QUESTION_OPTIONS: usize = 2;

/// Token lifetime when `JWT_EXPIRATION` is not set (one day).
pub const DEFAULT_JWT_EXPIRATION: u64 = 86_400;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// Browser client origin, used for CORS and checkout redirect URLs.
    pub client_url: String,
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_JWT_EXPIRATION);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        let client_url = env::var("CLIENT_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let stripe_api_base = env::var("STRIPE_API_BASE")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            client_url: client_url.trim_end_matches('/').to_string(),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok().filter(|k| !k.is_empty()),
            stripe_api_base: stripe_api_base.trim_end_matches('/').to_string(),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }
}
