// src/models/course.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{CourseId, UserId};

/// Represents the 'courses' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,

    /// The instructor who created the course.
    pub instructor_id: UserId,

    /// Enrollment price in cents.
    pub price_cents: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new course.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title is required."))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 20000))]
    pub description: String,
    #[validate(range(min = 0, max = 100_000_000))]
    pub price_cents: Option<i64>,
}

/// Platform-wide counters for the admin dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub user_count: i64,
    pub course_count: i64,
}
