use crate::{database::DbPool, services::identity::TokenVerifier};
use std::sync::Arc;

/// Application state shared across all HTTP handlers
///
/// This struct contains shared resources that need to be accessed
/// by API handlers: the database pool and the injected token verifier.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing the database
    pub pool: DbPool,
    /// Verifier for external identity-provider tokens
    pub token_verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Create a new AppState instance
    ///
    /// # Arguments
    /// * `pool` - Database connection pool
    /// * `token_verifier` - Verifier for bearer credentials
    pub fn new(pool: DbPool, token_verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            pool,
            token_verifier,
        }
    }
}
