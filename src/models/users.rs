use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub photo_url: Option<String>,
    pub role: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub photo_url: Option<String>,
}

/// Partial profile update; only supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Identity attested by the external token verifier.
///
/// The email is the join key to the internal user record; the subject id is
/// not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// User augmented with aggregate counts for the profile endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub courses_count: i64,
    pub assignments_count: i64,
}

impl ProfileView {
    pub fn new(user: User, courses_count: i64, assignments_count: i64) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            photo_url: user.photo_url,
            created_at: user.created_at,
            last_login: user.last_login,
            courses_count,
            assignments_count,
        }
    }
}
