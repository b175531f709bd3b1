// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, ProfileResponse, Role, SignupRequest, User},
    utils::{
        extract::AppJson,
        jwt::{Claims, sign_jwt},
        password::{hash_password, verify_password},
    },
};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registers a new student account.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created, or 409 if the email is already registered.
pub async fn signup(
    State(pool): State<PgPool>,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = normalize_email(&payload.email);
    let hashed_password = hash_password(&payload.password)?;

    sqlx::query(
        r#"
        INSERT INTO users (email, full_name, password, role)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&email)
    .bind(payload.full_name.trim())
    .bind(&hashed_password)
    .bind(Role::Student.as_str())
    .execute(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Conflict(format!("Email '{}' is already registered", email));
            }
        }
        tracing::error!("Failed to register user: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!("New user signed up: {}", email);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Signup successful! You can now log in." })),
    ))
}

/// Authenticates a user and returns a JWT token.
///
/// Unknown emails and wrong passwords produce the same 401.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, full_name, password, role, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(normalize_email(&payload.email))
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::from(e)
    })?;

    let invalid = || AppError::AuthError("Invalid login credentials".to_string());

    let user = user.ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(invalid());
    }

    let token = sign_jwt(
        user.id,
        Role::parse(&user.role),
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "message": "Login successful!",
        "token": token,
        "type": "Bearer",
        "user": user,
    })))
}

/// Returns the caller's name and role.
pub async fn profile(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let profile = sqlx::query_as::<_, ProfileResponse>(
        "SELECT full_name, role FROM users WHERE id = $1",
    )
    .bind(claims.user_id()?)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}
