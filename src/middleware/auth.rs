//! Bearer authentication middleware
//!
//! Resolves the Authorization header against the injected token verifier,
//! maps the verified identity to an internal user record, and adds the
//! current user to request extensions for handler access.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    models::users::User,
    queries,
    services::identity,
    state::AppState,
};

/// Authenticated user extracted from the bearer credential
///
/// This struct is added to request extensions by the auth middleware
/// after the identity is verified and mapped to an internal record.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    /// User's unique identifier
    pub id: i64,
    /// User's email address
    pub email: String,
    /// User's full name
    pub full_name: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        }
    }
}

/// Bearer authentication middleware
///
/// # Behavior
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies it through the injected token verifier (401 on any failure)
/// 3. Looks up the internal user by the verified email; a verified but
///    unregistered identity is 404, a disabled account is 403
/// 4. Adds `CurrentUser` to request extensions
///
/// # Usage
/// Apply this middleware to protected routes using `route_layer()`:
///
/// ```ignore
/// Router::new()
///     .route("/protected", get(protected_handler))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         auth_middleware,
///     ))
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());

    let identity = identity::resolve(state.token_verifier.as_ref(), auth_header)?;

    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let user = queries::users::get_user_by_email(&mut conn, &identity.email)
        .await?
        .ok_or_else(|| {
            Error::NotFound("User not found. Please register first.".to_string())
        })?;

    if !user.is_active {
        return Err(Error::Forbidden("User account is disabled".to_string()));
    }

    tracing::debug!(user_id = user.id, email = %user.email, "authenticated user");

    request.extensions_mut().insert(CurrentUser::from(user));
    Ok(next.run(request).await)
}
