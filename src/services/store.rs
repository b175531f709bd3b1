// src/services/store.rs

//! PostgreSQL-backed lookups used by the progress and grading services.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::ServiceError,
    models::{CourseId, LessonId, QuizId, question::AnswerKey},
    services::{grading::AnswerKeySource, progress::LessonCourseResolver},
};

#[async_trait]
impl LessonCourseResolver for PgPool {
    async fn resolve_courses(
        &self,
        lesson_ids: &BTreeSet<LessonId>,
    ) -> Result<HashMap<LessonId, CourseId>, ServiceError> {
        let ids: Vec<LessonId> = lesson_ids.iter().copied().collect();

        let rows: Vec<(LessonId, CourseId)> =
            sqlx::query_as("SELECT id, course_id FROM lessons WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(self)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to resolve lesson courses: {:?}", e);
                    ServiceError::from(e)
                })?;

        Ok(rows.into_iter().collect())
    }
}

#[async_trait]
impl AnswerKeySource for PgPool {
    async fn authoritative_answers(
        &self,
        quiz_id: QuizId,
    ) -> Result<Option<Vec<AnswerKey>>, ServiceError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM quizzes WHERE id = $1)")
            .bind(quiz_id)
            .fetch_one(self)
            .await?;

        if !exists {
            return Ok(None);
        }

        let keys = sqlx::query_as::<_, AnswerKey>(
            "SELECT id, correct_answer FROM questions WHERE quiz_id = $1 ORDER BY id",
        )
        .bind(quiz_id)
        .fetch_all(self)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch answer keys for quiz {}: {:?}", quiz_id, e);
            ServiceError::from(e)
        })?;

        Ok(Some(keys))
    }

    async fn question_count(&self, quiz_id: QuizId) -> Result<Option<i64>, ServiceError> {
        // No row at all means the quiz does not exist.
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT (SELECT COUNT(*) FROM questions WHERE quiz_id = q.id)
            FROM quizzes q
            WHERE q.id = $1
            "#,
        )
        .bind(quiz_id)
        .fetch_optional(self)
        .await?;

        Ok(count)
    }
}
