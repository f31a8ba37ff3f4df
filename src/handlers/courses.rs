//! Course CRUD handlers
//!
//! Every id-scoped operation runs the ownership check inside the service
//! layer before any mutation or disclosure.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};

use crate::{
    error::{Error, Result},
    middleware::auth::CurrentUser,
    models::courses::{CreateCourse, UpdateCourse},
    services::courses,
    state::AppState,
};

/// GET /api/v1/courses
///
/// Lists all courses owned by the current user, newest first.
pub async fn list_courses(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let courses = courses::list_courses(&mut conn, current_user.id).await?;

    Ok(Json(serde_json::json!({
        "courses": courses,
        "count": courses.len(),
    })))
}

/// POST /api/v1/courses
///
/// Creates a new course owned by the current user.
///
/// # HTTP Status Codes
/// - `201 CREATED`: Course created successfully
/// - `400 BAD_REQUEST`: Validation error
pub async fn create_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreateCourse>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let mut tx = state.pool.begin().await.map_err(|e| {
        Error::Internal(format!("Failed to begin transaction: {}", e))
    })?;

    let course = courses::create_course(tx.as_mut(), current_user.id, request).await?;

    tx.commit()
        .await
        .map_err(|e| Error::Internal(format!("Failed to commit transaction: {}", e)))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "course": course,
        })),
    ))
}

/// GET /api/v1/courses/{id}
///
/// Gets a single course. Absent and not-owned are both 404.
pub async fn get_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(course_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let course = courses::get_course(&mut conn, current_user.id, course_id).await?;

    Ok(Json(serde_json::json!({
        "course": course,
    })))
}

/// PUT /api/v1/courses/{id}
///
/// Applies a partial update to a course the current user owns.
///
/// # HTTP Status Codes
/// - `200 OK`: Course updated successfully
/// - `400 BAD_REQUEST`: Validation error
/// - `404 NOT_FOUND`: Course absent or owned by another user
pub async fn update_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(course_id): Path<i64>,
    Json(request): Json<UpdateCourse>,
) -> Result<Json<serde_json::Value>> {
    let mut tx = state.pool.begin().await.map_err(|e| {
        Error::Internal(format!("Failed to begin transaction: {}", e))
    })?;

    let course = courses::update_course(tx.as_mut(), current_user.id, course_id, request).await?;

    tx.commit()
        .await
        .map_err(|e| Error::Internal(format!("Failed to commit transaction: {}", e)))?;

    Ok(Json(serde_json::json!({
        "course": course,
    })))
}

/// DELETE /api/v1/courses/{id}
///
/// Deletes a course the current user owns, cascading to its assignments.
///
/// # HTTP Status Codes
/// - `200 OK`: Course deleted successfully
/// - `404 NOT_FOUND`: Course absent or owned by another user
/// - `409 CONFLICT`: Storage integrity prevents the delete
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(course_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let mut tx = state.pool.begin().await.map_err(|e| {
        Error::Internal(format!("Failed to begin transaction: {}", e))
    })?;

    courses::delete_course(tx.as_mut(), current_user.id, course_id).await?;

    tx.commit()
        .await
        .map_err(|e| Error::Internal(format!("Failed to commit transaction: {}", e)))?;

    Ok(Json(serde_json::json!({
        "message": "Course deleted successfully",
    })))
}
