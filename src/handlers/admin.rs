// src/handlers/admin.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{error::AppError, models::course::PlatformStats};

/// Platform statistics for the admin dashboard.
/// Admin only.
pub async fn stats(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let (user_count, course_count): (i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM users), (SELECT COUNT(*) FROM courses)",
    )
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to compute platform stats: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(PlatformStats {
        user_count,
        course_count,
    }))
}
