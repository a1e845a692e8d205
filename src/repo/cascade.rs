use super::{AssignmentRepo, CourseRepo, GradeRepo, RepoError};
use thiserror::Error;
use tracing::{info, warn};

/// A dependent delete failed after the course record was already gone.
/// Fail-forward: nothing is compensated, the caller retries the whole
/// cascade or reconciles by hand. `stage` names the collection that
/// failed.
#[derive(Debug, Error)]
#[error("cascade delete of course {course_id} failed while deleting {stage}")]
pub struct CascadeError {
    pub course_id: i64,
    pub stage: &'static str,
    #[source]
    pub source: RepoError,
}

/// Delete a course and everything it owns, in the order course ->
/// assignments -> grades. Dependent deletions go through their own
/// repositories so per-collection invariants hold; storage is never
/// touched directly here.
///
/// Not transactional: a failure partway leaves the course gone and some
/// dependents orphaned, surfaced as `CascadeError`.
pub async fn delete_course(
    courses: &CourseRepo,
    assignments: &AssignmentRepo,
    grades: &GradeRepo,
    course_id: i64,
) -> Result<bool, CascadeError> {
    let stage = |stage, source| CascadeError {
        course_id,
        stage,
        source,
    };

    courses
        .delete(course_id)
        .await
        .map_err(|e| stage("course", e))?;

    let owned = assignments
        .get_by_course(course_id)
        .await
        .map_err(|e| stage("assignments", e))?;
    for a in &owned {
        assignments
            .delete(a.id)
            .await
            .map_err(|e| stage("assignments", e))
            .inspect_err(|_| warn!(course_id, assignment_id = a.id, "cascade left orphans"))?;
    }

    let owned = grades
        .get_by_course(course_id)
        .await
        .map_err(|e| stage("grades", e))?;
    for g in &owned {
        grades
            .delete(g.id)
            .await
            .map_err(|e| stage("grades", e))
            .inspect_err(|_| warn!(course_id, grade_id = g.id, "cascade left orphans"))?;
    }

    info!(course_id, "cascade delete complete");
    Ok(true)
}
