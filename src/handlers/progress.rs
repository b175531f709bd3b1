// src/handlers/progress.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{
        LessonId,
        progress::{CompletionRecord, UpdateProgressRequest},
    },
    services::progress::aggregate_progress,
    utils::{extract::AppJson, jwt::Claims},
};

/// Returns the caller's completed lessons grouped by course.
///
/// Courses without completed lessons are absent from the object.
pub async fn all_progress(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let records = sqlx::query_as::<_, CompletionRecord>(
        "SELECT user_id, lesson_id FROM user_progress WHERE user_id = $1",
    )
    .bind(claims.user_id()?)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch progress: {:?}", e);
        AppError::from(e)
    })?;

    let completed: Vec<LessonId> = records.iter().map(|r| r.lesson_id).collect();

    let progress = aggregate_progress(&completed, &pool).await?;

    Ok(Json(progress))
}

/// Marks a lesson as complete for the caller.
///
/// Completing the same lesson twice is a no-op.
pub async fn update_progress(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<UpdateProgressRequest>,
) -> Result<impl IntoResponse, AppError> {
    let lesson_id = payload
        .lesson_id
        .ok_or(AppError::BadRequest("Lesson ID is required".to_string()))?;
    let user_id = claims.user_id()?;

    let lesson_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM lessons WHERE id = $1)")
            .bind(lesson_id)
            .fetch_one(&pool)
            .await?;

    if !lesson_exists {
        return Err(AppError::NotFound("Lesson not found".to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO user_progress (user_id, lesson_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, lesson_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(lesson_id)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to record progress: {:?}", e);
        AppError::from(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Progress updated successfully" })),
    ))
}
