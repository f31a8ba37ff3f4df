use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use std::fmt;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub user: String,
    #[serde(skip_serializing, default = "default_db_password")]
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub database: String,
}

/// Credentials for the external identity provider's token verifier.
///
/// Injected into the verifier at process start instead of living in ambient
/// global state, so tests can construct verifiers with their own secrets.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Issuer expected in verified identity tokens.
    pub issuer: String,
    /// Audience expected in verified identity tokens.
    pub audience: String,
    /// HMAC secret shared with the identity provider.
    #[serde(skip_serializing, default = "default_verifier_secret")]
    pub verifier_secret: SecretString,
}

fn default_db_password() -> SecretString {
    "password".to_string().into()
}

fn default_verifier_secret() -> SecretString {
    "dev-only-secret".to_string().into()
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            // Override with environment variables using `COURSEBOARD__` prefix and `__` separator
            // e.g., COURSEBOARD__DATABASE__USER="my_user"
            .add_source(
                config::Environment::with_prefix("COURSEBOARD")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl DatabaseConfig {
    /// Constructs the database connection string.
    pub fn connection_string(&self) -> SecretString {
        SecretString::from(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database
        ))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

// Default values for the database configuration
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: "password".to_string().into(),
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "https://identity.invalid".to_string(),
            audience: "courseboard".to_string(),
            verifier_secret: "dev-only-secret".to_string().into(),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use serde to serialize to pretty JSON
        // Secrets are automatically skipped due to #[serde(skip_serializing)]
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}
