// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use super::QuestionId;
use crate::config::MIN_QUESTION_OPTIONS;

/// A row of the 'questions' table as sent to the client.
/// Has no answer field, so the correct index cannot leak through it.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct PublicQuestion {
    pub id: QuestionId,
    pub question_text: String,
    pub options: Json<Vec<String>>,
}

/// Authoritative answer for one question, used only while grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct AnswerKey {
    pub id: QuestionId,
    pub correct_answer: i32,
}

/// DTO for creating a new question inside a quiz.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_correct_index))]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question_text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[validate(range(min = 0))]
    pub correct_answer: i32,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < MIN_QUESTION_OPTIONS {
        return Err(validator::ValidationError::new("not_enough_options"));
    }
    for opt in options {
        if opt.is_empty() || opt.len() > 500 {
            return Err(validator::ValidationError::new("invalid_option_length"));
        }
    }
    Ok(())
}

/// The correct index must point at one of the options.
fn validate_correct_index(req: &CreateQuestionRequest) -> Result<(), validator::ValidationError> {
    match usize::try_from(req.correct_answer) {
        Ok(idx) if idx < req.options.len() => Ok(()),
        _ => Err(validator::ValidationError::new("correct_answer_out_of_range")),
    }
}
