// src/models/lesson.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{CourseId, LessonId};

/// Represents the 'lessons' table in the database.
/// Clients present lessons in creation order.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub course_id: CourseId,
    pub title: String,
    pub content: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for adding a lesson to a course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title is required."))]
    pub title: String,
    #[validate(length(max = 50000))]
    pub content: Option<String>,
}
