// src/models/progress.rs

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{CourseId, LessonId, UserId};

/// Represents the 'user_progress' table: a user finished a lesson.
/// At most one row exists per (user_id, lesson_id).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub user_id: UserId,
    pub lesson_id: LessonId,
}

/// Completed lesson ids grouped by course.
///
/// Serializes as an object keyed by course id with arrays of lesson ids.
/// A course without completed lessons has no key at all.
pub type CourseProgress = BTreeMap<CourseId, BTreeSet<LessonId>>;

/// DTO for marking a lesson as complete.
#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    pub lesson_id: Option<LessonId>,
}
