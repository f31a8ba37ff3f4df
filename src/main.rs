use std::sync::Arc;

use axum::Router;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use courseboard::{AppState, api_router, load_config, services::identity::JwtTokenVerifier};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;

    let pool = sqlx::PgPool::connect(config.database.connection_string().expose_secret()).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let token_verifier = Arc::new(JwtTokenVerifier::new(&config.auth));
    let state = AppState::new(pool, token_verifier);

    let app = Router::new().nest("/api/v1", api_router(state));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "courseboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
