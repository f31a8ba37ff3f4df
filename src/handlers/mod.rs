pub mod assignments;
pub mod auth;
pub mod courses;
pub mod health;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Builds the full API router.
///
/// Every route except registration and the health probe runs behind the
/// bearer auth middleware.
pub fn api_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/auth/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
        .route(
            "/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/courses/{id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route(
            "/assignments",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route("/assignments/stats", get(assignments::get_statistics))
        .route("/assignments/upcoming", get(assignments::list_upcoming))
        .route("/assignments/overdue", get(assignments::list_overdue))
        .route(
            "/assignments/courses/{course_id}/assignments",
            get(assignments::list_for_course),
        )
        .route(
            "/assignments/{id}",
            get(assignments::get_assignment)
                .put(assignments::update_assignment)
                .delete(assignments::delete_assignment),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/register", post(auth::register))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
