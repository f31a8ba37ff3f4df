use courseboard::load_config;
use courseboard::models::users::VerifiedIdentity;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test database
pub async fn init_test_db() -> PgPool {
    INIT.call_once(|| {
        dotenvy::dotenv().ok();
    });

    let config = load_config().expect("Failed to load config");
    let pool = PgPool::connect(config.database.connection_string().expose_secret())
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Test database wrapper for better test isolation
///
/// Each test gets its own email namespace `test_{test_name}_...@example.com`.
/// Cleanup deletes users with that prefix; courses and assignments go with
/// them through the ON DELETE CASCADE chain.
pub struct TestDb {
    pub pool: PgPool,
    test_prefix: String,
}

impl TestDb {
    /// Creates a new test database instance with an isolated data namespace.
    ///
    /// `test_name` MUST match the test function name so parallel tests never
    /// share a prefix and leftover rows can be traced back to their test.
    pub async fn new(test_name: &str) -> Self {
        let pool = init_test_db().await;
        let test_prefix = format!("test_{}", test_name);

        // Clean up any existing data with this specific prefix (handles test retries)
        Self::cleanup_prefix(&pool, &test_prefix).await;

        Self { pool, test_prefix }
    }

    pub async fn get_connection(&self) -> sqlx::pool::PoolConnection<sqlx::Postgres> {
        self.pool
            .acquire()
            .await
            .expect("Failed to get database connection")
    }

    /// Get the test prefix for this test instance
    pub fn test_prefix(&self) -> &str {
        &self.test_prefix
    }

    /// Generate a unique test email with proper prefix
    pub fn generate_test_email(&self) -> String {
        let uuid = uuid::Uuid::now_v7();
        format!("{}_{}@example.com", self.test_prefix, uuid)
    }

    /// Build a verified identity for this test's namespace
    pub fn generate_identity(&self, email: &str, name: Option<&str>) -> VerifiedIdentity {
        VerifiedIdentity {
            subject: format!("sub_{}", email),
            email: email.to_string(),
            name: name.map(str::to_string),
            picture: None,
        }
    }

    /// Clean up users with specific test prefix
    async fn cleanup_prefix(pool: &PgPool, prefix: &str) {
        sqlx::query("DELETE FROM users WHERE email LIKE $1")
            .bind(format!("{}%", prefix))
            .execute(pool)
            .await
            .expect("Failed to cleanup test data");
    }

    /// Get a count of users with test prefix
    #[allow(dead_code)]
    pub async fn count_test_users(&self) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email LIKE $1")
            .bind(format!("{}%", self.test_prefix))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Check if a user exists by email
    #[allow(dead_code)]
    pub async fn user_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Count assignments currently stored for a course
    #[allow(dead_code)]
    pub async fn count_course_assignments(&self, course_id: i64) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM assignments WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Disable a user account directly, bypassing the service layer
    #[allow(dead_code)]
    pub async fn deactivate_user(&self, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET is_active = FALSE WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Cleanup test data when TestDb is dropped
        let pool = self.pool.clone();
        let prefix = self.test_prefix.clone();
        tokio::spawn(async move {
            let _ = sqlx::query("DELETE FROM users WHERE email LIKE $1")
                .bind(format!("{}%", prefix))
                .execute(&pool)
                .await;
        });
    }
}
