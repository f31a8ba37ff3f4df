//! Bearer credential resolution against the external identity provider.
//!
//! The provider is reached through the [`TokenVerifier`] trait so the
//! concrete verifier is injected into [`AppState`](crate::state::AppState)
//! at process start instead of living in ambient global state.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::{
    config::AuthConfig,
    error::{Error, Result},
    models::users::VerifiedIdentity,
};

/// Verifies an opaque bearer token issued by the identity provider.
pub trait TokenVerifier: Send + Sync {
    /// Verifies the token and returns the attested identity.
    ///
    /// Implementations report *why* verification failed; the resolver maps
    /// every failure to a uniform authentication error before it reaches the
    /// caller.
    fn verify(&self, token: &str) -> Result<VerifiedIdentity>;
}

/// Resolves a bearer credential from an Authorization header value.
///
/// A missing or malformed header fails before the verifier is consulted.
/// Any verification failure (expired, malformed, bad signature, revoked) is
/// logged and mapped uniformly to a single 401 message so callers cannot
/// probe token validity.
pub fn resolve(
    verifier: &dyn TokenVerifier,
    auth_header: Option<&str>,
) -> Result<VerifiedIdentity> {
    let token = auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            Error::Authentication("Missing or invalid Authorization header".to_string())
        })?;

    verifier.verify(token).map_err(|e| {
        tracing::warn!(error = %e, "token verification failed");
        Error::Authentication("Invalid or expired authentication token".to_string())
    })
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Token verifier for HMAC-signed provider ID tokens.
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        Self {
            decoding_key: DecodingKey::from_secret(
                config.verifier_secret.expose_secret().as_bytes(),
            ),
            validation,
        }
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity> {
        let data = decode::<IdTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| Error::Authentication(format!("token verification failed: {}", e)))?;

        Ok(VerifiedIdentity {
            subject: data.claims.sub,
            email: data.claims.email,
            name: data.claims.name.filter(|n| !n.is_empty()),
            picture: data.claims.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticVerifier {
        accept: &'static str,
    }

    impl TokenVerifier for StaticVerifier {
        fn verify(&self, token: &str) -> Result<VerifiedIdentity> {
            if token == self.accept {
                Ok(VerifiedIdentity {
                    subject: "subject-1".to_string(),
                    email: "user@example.com".to_string(),
                    name: Some("Test User".to_string()),
                    picture: None,
                })
            } else {
                Err(Error::Authentication("signature mismatch".to_string()))
            }
        }
    }

    #[test]
    fn test_resolve_missing_header() {
        let verifier = StaticVerifier { accept: "good" };
        let result = resolve(&verifier, None);
        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[test]
    fn test_resolve_malformed_header() {
        let verifier = StaticVerifier { accept: "good" };
        assert!(resolve(&verifier, Some("Basic abc")).is_err());
        assert!(resolve(&verifier, Some("Bearer ")).is_err());
        assert!(resolve(&verifier, Some("good")).is_err());
    }

    #[test]
    fn test_resolve_success() {
        let verifier = StaticVerifier { accept: "good" };
        let identity = resolve(&verifier, Some("Bearer good")).unwrap();
        assert_eq!(identity.email, "user@example.com");
    }

    #[test]
    fn test_verification_failure_is_uniform() {
        // The underlying reason never reaches the caller
        let verifier = StaticVerifier { accept: "good" };
        let err = resolve(&verifier, Some("Bearer forged")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authentication failed: Invalid or expired authentication token"
        );
    }

    #[test]
    fn test_jwt_verifier_round_trip() {
        use jsonwebtoken::{EncodingKey, Header, encode};
        use serde_json::json;

        let config = AuthConfig {
            issuer: "https://issuer.test".to_string(),
            audience: "courseboard-test".to_string(),
            verifier_secret: "test-secret".to_string().into(),
        };
        let verifier = JwtTokenVerifier::new(&config);

        let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
        let claims = json!({
            "sub": "abc123",
            "email": "prof@example.com",
            "name": "Prof Example",
            "iss": "https://issuer.test",
            "aud": "courseboard-test",
            "exp": exp,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let identity = verifier.verify(&token).unwrap();
        assert_eq!(identity.subject, "abc123");
        assert_eq!(identity.email, "prof@example.com");
        assert_eq!(identity.name.as_deref(), Some("Prof Example"));

        // Wrong secret must fail
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"other-secret"),
        )
        .unwrap();
        assert!(verifier.verify(&forged).is_err());
    }
}
