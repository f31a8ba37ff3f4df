use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use courseboard::services::identity::JwtTokenVerifier;
use courseboard::{AppState, api_router, load_config};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{Client, redirect::Policy};
use secrecy::ExposeSecret;
use tokio::net::TcpListener;

use crate::common::database::TestDb;

/// HTTP test application wrapper
///
/// Manages an Axum server running on a random port for HTTP testing.
/// Each test gets its own server instance to allow parallel test execution,
/// plus an isolated database namespace via [`TestDb`].
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client for making requests
    pub client: Client,
    /// Application config
    pub config: courseboard::Config,
    /// Isolated database namespace
    pub test_db: TestDb,
}

impl TestApp {
    /// Create a new HTTP test app with server on random port
    pub async fn new(test_name: &str) -> Self {
        let config = load_config().expect("Failed to load config");
        let test_db = TestDb::new(test_name).await;

        let token_verifier = Arc::new(JwtTokenVerifier::new(&config.auth));
        let app_state = AppState::new(test_db.pool.clone(), token_verifier);

        let app = Router::new().nest("/api/v1", api_router(app_state));

        // Bind to random port (port 0 tells OS to assign available port)
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        // Give server time to start
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            address,
            client,
            config,
            test_db,
        }
    }

    /// Get the full URL for an API endpoint
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Get the test prefix
    #[allow(dead_code)]
    pub fn test_prefix(&self) -> &str {
        self.test_db.test_prefix()
    }

    /// Generate a unique test email with proper prefix
    pub fn generate_test_email(&self) -> String {
        self.test_db.generate_test_email()
    }

    /// Sign an identity token the server's verifier accepts.
    ///
    /// Mirrors what the identity provider would issue: HS256 over the shared
    /// secret with the configured issuer and audience.
    pub fn token_for(&self, email: &str, name: Option<&str>) -> String {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
        let claims = serde_json::json!({
            "sub": format!("sub_{email}"),
            "email": email,
            "name": name,
            "iss": self.config.auth.issuer,
            "aud": self.config.auth.audience,
            "exp": exp,
        });
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.auth.verifier_secret.expose_secret().as_bytes()),
        )
        .expect("Failed to sign test token")
    }

    /// Sign a token with the wrong secret; the server must reject it.
    #[allow(dead_code)]
    pub fn forged_token_for(&self, email: &str) -> String {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
        let claims = serde_json::json!({
            "sub": format!("sub_{email}"),
            "email": email,
            "iss": self.config.auth.issuer,
            "aud": self.config.auth.audience,
            "exp": exp,
        });
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"not-the-shared-secret"),
        )
        .expect("Failed to sign forged token")
    }
}
