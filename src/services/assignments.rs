use chrono::{DateTime, Utc};

use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::assignments::{
        Assignment, AssignmentListQuery, AssignmentStatRow, AssignmentStats, CourseCount,
        CreateAssignment, SortBy, SortOrder, UpdateAssignment,
    },
    queries::assignments,
    queries::assignments::AssignmentFilter,
    services::{due_status, ownership},
    validation,
};

/// Default page size for the assignment listing.
pub const DEFAULT_LIMIT: i64 = 50;
/// Hard cap on the page size.
pub const MAX_LIMIT: i64 = 100;
/// Default number of items returned by the upcoming listing.
pub const DEFAULT_UPCOMING_LIMIT: i64 = 10;

/// Lists all assignments of a course the acting user owns, due date ascending.
pub async fn list_for_course(
    conn: &mut DbConn,
    user_id: i64,
    course_id: i64,
) -> Result<Vec<Assignment>> {
    ownership::require_owned_course(conn, user_id, course_id).await?;
    assignments::get_assignments_by_course(conn, course_id).await
}

/// Lists assignments across all of the user's courses with filtering,
/// search, sorting, and pagination.
///
/// A supplied course_id is ownership-checked first, so an id belonging to
/// another user is NotFound even though it exists. Pagination is applied
/// after filtering and sorting.
pub async fn list_all(
    conn: &mut DbConn,
    user_id: i64,
    query: AssignmentListQuery,
    now: DateTime<Utc>,
) -> Result<Vec<Assignment>> {
    let filter = parse_filter(query, now)?;

    if let Some(course_id) = filter.course_id {
        ownership::require_owned_course(conn, user_id, course_id).await?;
    }

    assignments::list_for_user(conn, user_id, &filter).await
}

/// Gets a single assignment, scoped through its owning course.
pub async fn get_assignment(
    conn: &mut DbConn,
    user_id: i64,
    assignment_id: i64,
) -> Result<Assignment> {
    ownership::require_owned_assignment(conn, user_id, assignment_id).await
}

/// Creates a new assignment inside a course the acting user owns.
///
/// The due date must be strictly in the future and the course ownership is
/// confirmed before any write happens.
pub async fn create_assignment(
    conn: &mut DbConn,
    user_id: i64,
    request: CreateAssignment,
    now: DateTime<Utc>,
) -> Result<Assignment> {
    validation::validate_required_string(&request.title, "Title")?;
    validation::validate_length(&request.title, "Title", 200)?;
    validation::validate_required_string(&request.prompt, "Prompt")?;
    if let Some(description) = &request.description {
        validation::validate_length(description, "Description", 2000)?;
    }
    validate_due_date(request.due_date, now)?;

    ownership::require_owned_course(conn, user_id, request.course_id).await?;

    let assignment = assignments::create_assignment(conn, request)
        .await
        .map_err(|e| {
            if e.is_foreign_key_violation() {
                Error::Validation("Failed to create assignment".to_string())
            } else {
                e
            }
        })?;

    tracing::info!(
        assignment_id = assignment.id,
        course_id = assignment.course_id,
        user_id,
        "assignment created"
    );
    Ok(assignment)
}

/// Applies a partial update to an assignment the acting user owns.
pub async fn update_assignment(
    conn: &mut DbConn,
    user_id: i64,
    assignment_id: i64,
    patch: UpdateAssignment,
    now: DateTime<Utc>,
) -> Result<Assignment> {
    ownership::require_owned_assignment(conn, user_id, assignment_id).await?;

    if let Some(title) = &patch.title {
        validation::validate_required_string(title, "Title")?;
        validation::validate_length(title, "Title", 200)?;
    }
    if let Some(prompt) = &patch.prompt {
        validation::validate_required_string(prompt, "Prompt")?;
    }
    if let Some(description) = &patch.description {
        validation::validate_length(description, "Description", 2000)?;
    }
    if let Some(due_date) = patch.due_date {
        validate_due_date(due_date, now)?;
    }

    let assignment = assignments::update_assignment(conn, assignment_id, patch).await?;
    tracing::info!(assignment_id, user_id, "assignment updated");
    Ok(assignment)
}

/// Deletes an assignment the acting user owns.
pub async fn delete_assignment(
    conn: &mut DbConn,
    user_id: i64,
    assignment_id: i64,
) -> Result<()> {
    ownership::require_owned_assignment(conn, user_id, assignment_id).await?;

    assignments::delete_assignment(conn, assignment_id)
        .await
        .map_err(|e| {
            if e.is_foreign_key_violation() {
                Error::Conflict("Cannot delete assignment with existing drafts".to_string())
            } else {
                e
            }
        })?;

    tracing::info!(assignment_id, user_id, "assignment deleted");
    Ok(())
}

/// Upcoming assignments across the user's courses, soonest first.
pub async fn upcoming(
    conn: &mut DbConn,
    user_id: i64,
    limit: Option<i64>,
    now: DateTime<Utc>,
) -> Result<Vec<Assignment>> {
    let limit = limit.unwrap_or(DEFAULT_UPCOMING_LIMIT).clamp(1, MAX_LIMIT);
    assignments::upcoming_for_user(conn, user_id, now, limit).await
}

/// Overdue assignments across the user's courses, most recently due first.
pub async fn overdue(conn: &mut DbConn, user_id: i64, now: DateTime<Utc>) -> Result<Vec<Assignment>> {
    assignments::overdue_for_user(conn, user_id, now).await
}

/// Aggregate statistics over the user's assignments.
///
/// Single pass over the scoped rows; the buckets come from the same
/// classification as every list response.
pub async fn statistics(
    conn: &mut DbConn,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<AssignmentStats> {
    let rows = assignments::stat_rows_for_user(conn, user_id).await?;
    Ok(compute_stats(&rows, now))
}

fn compute_stats(rows: &[AssignmentStatRow], now: DateTime<Utc>) -> AssignmentStats {
    let mut overdue = 0;
    let mut due_soon = 0;
    let mut upcoming = 0;
    let mut by_course: Vec<CourseCount> = Vec::new();

    for row in rows {
        match due_status::bucket(row.due_date, now) {
            due_status::DueStatus::Overdue => overdue += 1,
            due_status::DueStatus::DueSoon => due_soon += 1,
            due_status::DueStatus::Upcoming => upcoming += 1,
        }

        match by_course
            .iter_mut()
            .find(|c| c.course_name == row.course_name)
        {
            Some(entry) => entry.count += 1,
            None => by_course.push(CourseCount {
                course_name: row.course_name.clone(),
                count: 1,
            }),
        }
    }

    AssignmentStats {
        total: rows.len() as i64,
        overdue,
        due_soon,
        upcoming,
        by_course,
    }
}

/// Parses raw query parameters into an executable filter.
///
/// The status filter parses strictly (a malformed value is a validation
/// error); sort keys parse leniently and fall back to their defaults.
/// The limit is capped at [`MAX_LIMIT`] and the offset clamped to >= 0.
fn parse_filter(query: AssignmentListQuery, now: DateTime<Utc>) -> Result<AssignmentFilter> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse().map_err(|_| {
            Error::Validation(format!(
                "Invalid status filter '{}': expected overdue, due_soon, or upcoming",
                raw
            ))
        })?),
    };

    let sort_by = query
        .sort_by
        .as_deref()
        .and_then(|raw| raw.parse::<SortBy>().ok())
        .unwrap_or_default();
    let order = query
        .order
        .as_deref()
        .and_then(|raw| raw.parse::<SortOrder>().ok())
        .unwrap_or_default();

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    Ok(AssignmentFilter {
        status,
        course_id: query.course_id,
        search: query.search.filter(|s| !s.trim().is_empty()),
        sort_by,
        order,
        limit,
        offset,
        now,
    })
}

fn validate_due_date(due_date: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if due_date <= now {
        return Err(Error::Validation(
            "Due date must be in the future".to_string(),
        ));
    }
    Ok(())
}
