// src/services/grading.rs

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::ServiceError,
    models::{
        QuizId,
        question::AnswerKey,
        quiz::{QuizScore, SubmittedAnswers},
    },
};

/// Server-side source of the correct answers for a quiz.
///
/// Both lookups return `None` when the quiz itself does not exist, and
/// `Some` (possibly empty / zero) for an existing quiz.
#[async_trait]
pub trait AnswerKeySource: Send + Sync {
    async fn authoritative_answers(
        &self,
        quiz_id: QuizId,
    ) -> Result<Option<Vec<AnswerKey>>, ServiceError>;

    async fn question_count(&self, quiz_id: QuizId) -> Result<Option<i64>, ServiceError>;
}

fn quiz_not_found() -> ServiceError {
    ServiceError::NotFound("Quiz not found or has no questions.".to_string())
}

/// Interprets a submitted answer as an option index.
///
/// Accepts integers, floats without a fractional part and numeric strings.
/// Anything else is treated as unanswered.
pub fn option_index(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Counts answer keys matched by the submission.
/// Questions missing from the submission count as incorrect; submitted keys
/// that name no stored question never match anything.
fn count_correct(answers: &SubmittedAnswers, keys: &[AnswerKey]) -> i64 {
    keys.iter()
        .filter(|key| {
            answers
                .get(&key.id.to_string())
                .and_then(option_index)
                .is_some_and(|picked| picked == i64::from(key.correct_answer))
        })
        .count() as i64
}

/// Grades a submission against the stored answers of `quiz_id`.
///
/// `total` is always the number of stored questions, never the number of
/// submitted answers. An empty submission skips the comparison pass and only
/// asks the source for the question count.
///
/// # Errors
///
/// `ServiceError::NotFound` when the quiz does not exist.
/// `ServiceError::DataAccess` when a lookup fails.
pub async fn grade_quiz<S>(
    quiz_id: QuizId,
    answers: &SubmittedAnswers,
    source: &S,
) -> Result<QuizScore, ServiceError>
where
    S: AnswerKeySource + ?Sized,
{
    if answers.is_empty() {
        let total = source
            .question_count(quiz_id)
            .await?
            .ok_or_else(quiz_not_found)?;
        return Ok(QuizScore { score: 0, total });
    }

    let keys = source
        .authoritative_answers(quiz_id)
        .await?
        .ok_or_else(quiz_not_found)?;

    tracing::debug!(
        "Grading quiz {}: {} submitted answers against {} questions",
        quiz_id,
        answers.len(),
        keys.len()
    );

    Ok(QuizScore {
        score: count_correct(answers, &keys),
        total: keys.len() as i64,
    })
}
