// src/models/quiz.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{CourseId, QuizId, question::{CreateQuestionRequest, PublicQuestion}};

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub course_id: CourseId,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Quiz as shown to a learner: questions without their answers.
#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub id: QuizId,
    pub title: String,
    pub questions: Vec<PublicQuestion>,
}

/// Learner answers.
/// Key: Question ID as sent by the client (JSON object keys are strings).
/// Value: selected option index, as a number or a numeric string.
/// Keys that name no stored question are ignored while grading.
pub type SubmittedAnswers = HashMap<String, serde_json::Value>;

/// DTO for submitting a quiz attempt.
/// Both fields are optional at the serde level so a missing one is reported as a 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub quiz_id: Option<QuizId>,
    pub answers: Option<SubmittedAnswers>,
}

/// Result of grading one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    pub score: i64,
    pub total: i64,
}

/// DTO for creating a quiz together with its questions.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    pub course_id: CourseId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 200), nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_with(questions: serde_json::Value) -> CreateQuizRequest {
        serde_json::from_value(serde_json::json!({
            "courseId": 1,
            "title": "Week 1",
            "questions": questions,
        }))
        .unwrap()
    }

    #[test]
    fn valid_quiz_passes() {
        let req = quiz_with(serde_json::json!([
            { "questionText": "2 + 2?", "options": ["3", "4"], "correctAnswer": 1 }
        ]));

        assert!(req.validate().is_ok());
    }

    #[test]
    fn invalid_nested_question_fails_the_quiz() {
        let req = quiz_with(serde_json::json!([
            { "questionText": "2 + 2?", "options": ["3", "4"], "correctAnswer": 1 },
            { "questionText": "Pick one", "options": ["a", "b"], "correctAnswer": 5 }
        ]));

        let errors = req.validate().unwrap_err();
        assert!(errors.errors().contains_key("questions"));
    }

    #[test]
    fn quiz_without_questions_is_allowed() {
        assert!(quiz_with(serde_json::json!([])).validate().is_ok());
    }

    #[test]
    fn answers_accept_non_numeric_keys() {
        let req: SubmitQuizRequest = serde_json::from_value(serde_json::json!({
            "quizId": 3,
            "answers": { "q1": 2, "4": "1" }
        }))
        .unwrap();

        let answers = req.answers.unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers["4"], serde_json::json!("1"));
    }
}
