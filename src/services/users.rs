use crate::DbConn;
use crate::{
    error::Result,
    models::users::{NewUser, ProfileView, UpdateProfile, User, VerifiedIdentity},
    queries::{assignments, courses, users},
    validation,
};

/// Resolves a verified identity to an internal user record, creating one on
/// first sight.
///
/// Email is the authoritative join key. An existing user gets its last-login
/// marker stamped; an unseen email gets a fresh record with the display name
/// falling back to the email's local part. Concurrent first logins for the
/// same email race on the insert; the unique constraint on email decides the
/// winner and the loser retries the lookup instead of failing.
pub async fn resolve_or_create(conn: &mut DbConn, identity: VerifiedIdentity) -> Result<User> {
    validation::validate_email(&identity.email)?;

    if let Some(existing) = users::get_user_by_email(conn, &identity.email).await? {
        let user = users::touch_last_login(conn, existing.id).await?;
        tracing::info!(user_id = user.id, email = %user.email, "user logged in");
        return Ok(user);
    }

    let full_name = identity
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| local_part(&identity.email).to_string());

    let new_user = NewUser {
        email: identity.email.clone(),
        full_name,
        photo_url: identity.picture.clone(),
    };

    match users::create_user(conn, new_user).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, email = %user.email, "new user registered");
            Ok(user)
        }
        Err(e) if e.is_unique_violation() => {
            // Someone else just created it; the lookup must now succeed
            tracing::debug!(email = %identity.email, "lost first-login race, retrying lookup");
            let user = users::get_user_by_email(conn, &identity.email)
                .await?
                .ok_or(e)?;
            users::touch_last_login(conn, user.id).await
        }
        Err(e) => Err(e),
    }
}

/// Augments the user with course and assignment counts for the profile view.
pub async fn get_profile(conn: &mut DbConn, user: User) -> Result<ProfileView> {
    let courses_count = courses::count_by_owner(conn, user.id).await?;
    let assignments_count = assignments::count_by_owner(conn, user.id).await?;

    Ok(ProfileView::new(user, courses_count, assignments_count))
}

/// Applies a partial profile update for the acting user.
pub async fn update_profile(
    conn: &mut DbConn,
    user_id: i64,
    patch: UpdateProfile,
) -> Result<User> {
    validation::validate_full_name(&patch.full_name)?;

    let user = users::update_profile(conn, user_id, patch).await?;
    tracing::info!(user_id = user.id, "profile updated");
    Ok(user)
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
