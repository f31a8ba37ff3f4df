//! Ownership scoping for courses and assignments.
//!
//! Every mutating or disclosing operation in the course and assignment
//! services goes through these two checks. An ownership mismatch collapses
//! to the same NotFound as true non-existence so other users' resource ids
//! cannot be enumerated.

use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::{assignments::Assignment, courses::Course},
    queries::{assignments, courses},
};

/// Fetches a course and confirms the acting user owns it.
///
/// Absent and not-owned are indistinguishable: both are NotFound.
pub async fn require_owned_course(
    conn: &mut DbConn,
    user_id: i64,
    course_id: i64,
) -> Result<Course> {
    let course = courses::get_course_by_id(conn, course_id)
        .await?
        .filter(|c| c.user_id == user_id)
        .ok_or_else(|| Error::NotFound("Course not found".to_string()))?;

    Ok(course)
}

/// Fetches an assignment and confirms the acting user owns its course.
pub async fn require_owned_assignment(
    conn: &mut DbConn,
    user_id: i64,
    assignment_id: i64,
) -> Result<Assignment> {
    let assignment = assignments::get_assignment_by_id(conn, assignment_id)
        .await?
        .ok_or_else(|| Error::NotFound("Assignment not found".to_string()))?;

    // Ownership is transitive through the owning course; a mismatch collapses
    // to the same NotFound as a missing assignment
    match require_owned_course(conn, user_id, assignment.course_id).await {
        Ok(_) => Ok(assignment),
        Err(Error::NotFound(_)) => Err(Error::NotFound("Assignment not found".to_string())),
        Err(e) => Err(e),
    }
}
