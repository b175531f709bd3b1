// src/services/progress.rs

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;

use crate::{
    error::ServiceError,
    models::{CourseId, LessonId, progress::CourseProgress},
};

/// Looks up the owning course of each lesson.
///
/// Implementations may omit ids they cannot resolve.
#[async_trait]
pub trait LessonCourseResolver: Send + Sync {
    async fn resolve_courses(
        &self,
        lesson_ids: &BTreeSet<LessonId>,
    ) -> Result<HashMap<LessonId, CourseId>, ServiceError>;
}

/// Groups one user's completed lessons by course.
///
/// * Duplicate lesson ids collapse into one entry.
/// * Empty input returns an empty map without calling the resolver.
/// * Lessons the resolver cannot place are dropped.
///
/// Any resolver failure fails the whole aggregation.
pub async fn aggregate_progress<R>(
    completed: &[LessonId],
    resolver: &R,
) -> Result<CourseProgress, ServiceError>
where
    R: LessonCourseResolver + ?Sized,
{
    let distinct: BTreeSet<LessonId> = completed.iter().copied().collect();

    let mut progress = CourseProgress::new();
    if distinct.is_empty() {
        return Ok(progress);
    }

    let owners = resolver.resolve_courses(&distinct).await?;

    for lesson_id in distinct {
        match owners.get(&lesson_id) {
            Some(course_id) => {
                progress.entry(*course_id).or_default().insert(lesson_id);
            }
            None => tracing::debug!("Dropping unresolved lesson {}", lesson_id),
        }
    }

    Ok(progress)
}
