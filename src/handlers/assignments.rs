//! Assignment handlers
//!
//! Listing, filtering, statistics, and CRUD. Status fields in every response
//! are derived against a single reference time taken at the start of the
//! request, so a page of results is internally consistent.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    middleware::auth::CurrentUser,
    models::assignments::{
        Assignment, AssignmentListQuery, AssignmentView, CreateAssignment, UpdateAssignment,
    },
    services::assignments,
    state::AppState,
};

fn to_views(items: Vec<Assignment>, now: chrono::DateTime<Utc>) -> Vec<AssignmentView> {
    items
        .into_iter()
        .map(|a| AssignmentView::new(a, now))
        .collect()
}

/// GET /api/v1/assignments
///
/// Lists assignments across all of the current user's courses.
///
/// # Query Parameters
/// - `status`: overdue | due_soon | upcoming
/// - `course_id`: restrict to one owned course (404 if not owned)
/// - `search`: case-insensitive substring match on title
/// - `sort_by`: due_date | title | created_at (default due_date)
/// - `order`: asc | desc (default asc)
/// - `limit`: max 100, default 50
/// - `offset`: >= 0, default 0
pub async fn list_assignments(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<AssignmentListQuery>,
) -> Result<Json<serde_json::Value>> {
    let now = Utc::now();
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let items = assignments::list_all(&mut conn, current_user.id, query, now).await?;
    let views = to_views(items, now);

    Ok(Json(serde_json::json!({
        "assignments": views,
        "count": views.len(),
    })))
}

/// GET /api/v1/assignments/stats
///
/// Aggregate statistics over the current user's assignments.
pub async fn get_statistics(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>> {
    let now = Utc::now();
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let stats = assignments::statistics(&mut conn, current_user.id, now).await?;

    Ok(Json(serde_json::to_value(stats).map_err(|e| {
        Error::Internal(format!("Failed to serialize statistics: {}", e))
    })?))
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/assignments/upcoming
///
/// Upcoming assignments across the current user's courses, soonest first.
pub async fn list_upcoming(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<serde_json::Value>> {
    let now = Utc::now();
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let items = assignments::upcoming(&mut conn, current_user.id, query.limit, now).await?;
    let views = to_views(items, now);

    Ok(Json(serde_json::json!({
        "assignments": views,
        "count": views.len(),
    })))
}

/// GET /api/v1/assignments/overdue
///
/// Overdue assignments across the current user's courses, most recently due
/// first.
pub async fn list_overdue(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>> {
    let now = Utc::now();
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let items = assignments::overdue(&mut conn, current_user.id, now).await?;
    let views = to_views(items, now);

    Ok(Json(serde_json::json!({
        "assignments": views,
        "count": views.len(),
    })))
}

/// GET /api/v1/assignments/courses/{course_id}/assignments
///
/// All assignments of one owned course, due date ascending.
pub async fn list_for_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(course_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let now = Utc::now();
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let items = assignments::list_for_course(&mut conn, current_user.id, course_id).await?;
    let views = to_views(items, now);

    Ok(Json(serde_json::json!({
        "assignments": views,
        "count": views.len(),
    })))
}

/// POST /api/v1/assignments
///
/// Creates an assignment inside a course the current user owns.
///
/// # HTTP Status Codes
/// - `201 CREATED`: Assignment created successfully
/// - `400 BAD_REQUEST`: Validation error (empty title/prompt, past due date)
/// - `404 NOT_FOUND`: Course absent or owned by another user
pub async fn create_assignment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreateAssignment>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let now = Utc::now();
    let mut tx = state.pool.begin().await.map_err(|e| {
        Error::Internal(format!("Failed to begin transaction: {}", e))
    })?;

    let assignment =
        assignments::create_assignment(tx.as_mut(), current_user.id, request, now).await?;

    tx.commit()
        .await
        .map_err(|e| Error::Internal(format!("Failed to commit transaction: {}", e)))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "assignment": AssignmentView::new(assignment, now),
        })),
    ))
}

/// GET /api/v1/assignments/{id}
///
/// Gets a single assignment, scoped through its owning course.
pub async fn get_assignment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let now = Utc::now();
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let assignment = assignments::get_assignment(&mut conn, current_user.id, assignment_id).await?;

    Ok(Json(serde_json::json!({
        "assignment": AssignmentView::new(assignment, now),
    })))
}

/// PUT /api/v1/assignments/{id}
///
/// Applies a partial update; a supplied due date is revalidated as future.
pub async fn update_assignment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(assignment_id): Path<i64>,
    Json(request): Json<UpdateAssignment>,
) -> Result<Json<serde_json::Value>> {
    let now = Utc::now();
    let mut tx = state.pool.begin().await.map_err(|e| {
        Error::Internal(format!("Failed to begin transaction: {}", e))
    })?;

    let assignment =
        assignments::update_assignment(tx.as_mut(), current_user.id, assignment_id, request, now)
            .await?;

    tx.commit()
        .await
        .map_err(|e| Error::Internal(format!("Failed to commit transaction: {}", e)))?;

    Ok(Json(serde_json::json!({
        "assignment": AssignmentView::new(assignment, now),
    })))
}

/// DELETE /api/v1/assignments/{id}
///
/// Deletes an assignment the current user owns.
pub async fn delete_assignment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let mut tx = state.pool.begin().await.map_err(|e| {
        Error::Internal(format!("Failed to begin transaction: {}", e))
    })?;

    assignments::delete_assignment(tx.as_mut(), current_user.id, assignment_id).await?;

    tx.commit()
        .await
        .map_err(|e| Error::Internal(format!("Failed to commit transaction: {}", e)))?;

    Ok(Json(serde_json::json!({
        "message": "Assignment deleted successfully",
    })))
}
