use axum::{Json, extract::State};

use crate::{error::Result, state::AppState};

/// GET /api/v1/health
///
/// Liveness probe including a database ping.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let db = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            "unavailable"
        }
    };

    Ok(Json(serde_json::json!({
        "status": "ok",
        "database": db,
    })))
}
