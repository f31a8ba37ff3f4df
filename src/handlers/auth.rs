//! Registration and profile handlers
//!
//! Handlers follow the thin-layer pattern: they extract inputs, delegate to
//! services, and shape responses. All business logic is in the service layer.

use axum::{
    Json,
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
};

use crate::{
    error::{Error, Result},
    middleware::auth::CurrentUser,
    models::users::UpdateProfile,
    services::{identity, users},
    state::AppState,
};

/// POST /api/v1/auth/register
///
/// Registers or logs in a user from the bearer credential in the
/// Authorization header. The identity provider is the source of truth;
/// an unseen email creates a fresh internal record, a known email just
/// stamps its last login.
///
/// # HTTP Status Codes
/// - `201 CREATED`: User resolved or created successfully
/// - `401 UNAUTHORIZED`: Missing or invalid bearer credential
/// - `500 INTERNAL_SERVER_ERROR`: Database error
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
    let verified = identity::resolve(state.token_verifier.as_ref(), auth_header)?;

    // Autocommit connection: the unique-violation retry inside
    // resolve_or_create must keep working after a failed insert, which an
    // open transaction would abort
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let user = users::resolve_or_create(&mut conn, verified).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "user": user,
        })),
    ))
}

/// GET /api/v1/auth/profile
///
/// Returns the current user's profile with course and assignment counts.
///
/// # HTTP Status Codes
/// - `200 OK`: Profile retrieved successfully
/// - `401 UNAUTHORIZED`: Missing or invalid bearer credential
/// - `404 NOT_FOUND`: Verified identity has no internal record yet
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let user = crate::queries::users::get_user_by_id(&mut conn, current_user.id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    let profile = users::get_profile(&mut conn, user).await?;

    Ok(Json(serde_json::json!({
        "profile": profile,
    })))
}

/// PUT /api/v1/auth/profile
///
/// Applies a partial profile update (full_name, photo_url).
///
/// # HTTP Status Codes
/// - `200 OK`: Profile updated successfully
/// - `400 BAD_REQUEST`: Validation error
/// - `401 UNAUTHORIZED`: Missing or invalid bearer credential
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<UpdateProfile>,
) -> Result<Json<serde_json::Value>> {
    let mut tx = state.pool.begin().await.map_err(|e| {
        Error::Internal(format!("Failed to begin transaction: {}", e))
    })?;

    let user = users::update_profile(tx.as_mut(), current_user.id, request).await?;
    let profile = users::get_profile(tx.as_mut(), user).await?;

    tx.commit()
        .await
        .map_err(|e| Error::Internal(format!("Failed to commit transaction: {}", e)))?;

    Ok(Json(serde_json::json!({
        "profile": profile,
    })))
}
