// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::UserId;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Unique login email.
    pub email: String,

    pub full_name: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'student', 'instructor' or 'admin'.
    pub role: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Capability level carried in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    /// Unknown role strings degrade to the least privileged role.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "admin" => Role::Admin,
            "instructor" => Role::Instructor,
            _ => Role::Student,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }

    /// Instructors (and admins) may create courses, lessons and quizzes.
    pub fn can_author_courses(&self) -> bool {
        matches!(self, Role::Instructor | Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Profile data returned to the logged-in user.
#[derive(Debug, Serialize, FromRow)]
pub struct ProfileResponse {
    pub full_name: String,
    pub role: String,
}

/// DTO for creating a new user (Signup).
///
/// Missing fields deserialize as empty strings so they surface as validation
/// errors (400) rather than extractor rejections.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(email(message = "A valid email is required."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 characters."
    ))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Full name is required."))]
    pub full_name: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 254, message = "Email is required."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 128, message = "Password is required."))]
    pub password: String,
}
