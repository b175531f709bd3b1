// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::courses::ensure_course_owner,
    models::{
        CourseId, QuizId,
        question::PublicQuestion,
        quiz::{CreateQuizRequest, Quiz, QuizResponse, SubmitQuizRequest},
    },
    services::grading::grade_quiz,
    utils::{extract::AppJson, jwt::Claims},
};

/// Fetches the public questions of a quiz, in creation order.
async fn public_questions(pool: &PgPool, quiz_id: QuizId) -> Result<Vec<PublicQuestion>, AppError> {
    let questions = sqlx::query_as::<_, PublicQuestion>(
        "SELECT id, question_text, options FROM questions WHERE quiz_id = $1 ORDER BY id",
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch questions for quiz {}: {:?}", quiz_id, e);
        AppError::from(e)
    })?;

    Ok(questions)
}

/// Returns the quiz attached to a course.
///
/// Questions go out as `PublicQuestion`, which has no answer field.
pub async fn get_course_quiz(
    State(pool): State<PgPool>,
    Path(course_id): Path<CourseId>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, course_id, title, created_at
        FROM quizzes
        WHERE course_id = $1
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(course_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Quiz not found for this course.".to_string()))?;

    let questions = public_questions(&pool, quiz.id).await?;

    Ok(Json(QuizResponse {
        id: quiz.id,
        title: quiz.title,
        questions,
    }))
}

/// Creates a quiz and its questions for a course the caller owns.
pub async fn create_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    ensure_course_owner(&pool, payload.course_id, &claims).await?;

    let mut tx = pool.begin().await?;

    let quiz_id: QuizId =
        sqlx::query_scalar("INSERT INTO quizzes (course_id, title) VALUES ($1, $2) RETURNING id")
            .bind(payload.course_id)
            .bind(payload.title.trim())
            .fetch_one(&mut *tx)
            .await?;

    for question in &payload.questions {
        sqlx::query(
            r#"
            INSERT INTO questions (quiz_id, question_text, options, correct_answer)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(quiz_id)
        .bind(question.question_text.trim())
        .bind(SqlJson(&question.options))
        .bind(question.correct_answer)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        "Quiz {} created for course {} with {} questions",
        quiz_id,
        payload.course_id,
        payload.questions.len()
    );

    let questions = public_questions(&pool, quiz_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(QuizResponse {
            id: quiz_id,
            title: payload.title.trim().to_string(),
            questions,
        }),
    ))
}

/// Grades a quiz submission and returns `{score, total}`.
///
/// The score is not stored.
pub async fn submit_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(quiz_id), Some(answers)) = (req.quiz_id, req.answers) else {
        return Err(AppError::BadRequest("Missing quizId or answers.".to_string()));
    };

    let result = grade_quiz(quiz_id, &answers, &pool).await?;

    tracing::info!(
        "User {} scored {}/{} on quiz {}",
        claims.sub,
        result.score,
        result.total,
        quiz_id
    );

    Ok(Json(result))
}
