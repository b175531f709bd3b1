// src/handlers/courses.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::DEFAULT_COURSE_PRICE_CENTS,
    error::AppError,
    models::{
        CourseId, UserId,
        course::{Course, CreateCourseRequest},
        lesson::{CreateLessonRequest, Lesson},
    },
    utils::{extract::AppJson, jwt::Claims, sanitize::sanitize_rich_text},
};

const COURSE_COLUMNS: &str = "id, title, description, instructor_id, price_cents, created_at";

/// Checks that the caller owns `course_id` (admins may act on any course).
///
/// Returns 404 for an unknown course and 403 for someone else's course.
pub(crate) async fn ensure_course_owner(
    pool: &PgPool,
    course_id: CourseId,
    claims: &Claims,
) -> Result<(), AppError> {
    let instructor_id: UserId =
        sqlx::query_scalar("SELECT instructor_id FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(pool)
            .await?
            .ok_or(AppError::NotFound("Course not found".to_string()))?;

    if instructor_id != claims.user_id()? && !claims.role.is_admin() {
        return Err(AppError::Forbidden(
            "Forbidden. You do not own this course.".to_string(),
        ));
    }
    Ok(())
}

/// Lists every course in the catalog.
pub async fn list_courses(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let courses = sqlx::query_as::<_, Course>(&format!(
        "SELECT {} FROM courses ORDER BY created_at DESC, id DESC",
        COURSE_COLUMNS
    ))
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list courses: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(courses))
}

/// Retrieves a single course by ID.
pub async fn get_course(
    State(pool): State<PgPool>,
    Path(id): Path<CourseId>,
) -> Result<impl IntoResponse, AppError> {
    let course = sqlx::query_as::<_, Course>(&format!(
        "SELECT {} FROM courses WHERE id = $1",
        COURSE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Course not found".to_string()))?;

    Ok(Json(course))
}

/// Creates a course owned by the calling instructor.
pub async fn create_course(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let course = sqlx::query_as::<_, Course>(&format!(
        r#"
        INSERT INTO courses (title, description, instructor_id, price_cents)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        COURSE_COLUMNS
    ))
    .bind(payload.title.trim())
    .bind(sanitize_rich_text(&payload.description))
    .bind(claims.user_id()?)
    .bind(payload.price_cents.unwrap_or(DEFAULT_COURSE_PRICE_CENTS))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create course: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!("Course {} created by instructor {}", course.id, course.instructor_id);

    Ok((StatusCode::CREATED, Json(course)))
}

/// Lists the courses taught by the caller.
pub async fn my_courses(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let courses = sqlx::query_as::<_, Course>(&format!(
        "SELECT {} FROM courses WHERE instructor_id = $1 ORDER BY created_at DESC, id DESC",
        COURSE_COLUMNS
    ))
    .bind(claims.user_id()?)
    .fetch_all(&pool)
    .await?;

    Ok(Json(courses))
}

/// Lists a course's lessons in creation order.
pub async fn list_lessons(
    State(pool): State<PgPool>,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, AppError> {
    let lessons = sqlx::query_as::<_, Lesson>(
        r#"
        SELECT id, course_id, title, content, created_at
        FROM lessons
        WHERE course_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(course_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(lessons))
}

/// Appends a lesson to a course the caller owns.
pub async fn create_lesson(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<CourseId>,
    AppJson(payload): AppJson<CreateLessonRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    ensure_course_owner(&pool, course_id, &claims).await?;

    let lesson = sqlx::query_as::<_, Lesson>(
        r#"
        INSERT INTO lessons (course_id, title, content)
        VALUES ($1, $2, $3)
        RETURNING id, course_id, title, content, created_at
        "#,
    )
    .bind(course_id)
    .bind(payload.title.trim())
    .bind(payload.content.as_deref().map(sanitize_rich_text))
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(lesson)))
}
