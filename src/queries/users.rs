use crate::{
    error::{Error, Result},
    models::users::{NewUser, UpdateProfile, User},
};

use crate::DbConn;

const USER_COLUMNS: &str =
    "id, email, full_name, photo_url, role, is_active, last_login, created_at, updated_at";

/// Creates a new user in the database.
///
/// A unique-constraint violation on email is returned as-is so the caller
/// can distinguish a concurrent first login from other failures.
pub async fn create_user(conn: &mut DbConn, new_user: NewUser) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (email, full_name, photo_url, is_active, last_login)
        VALUES ($1, $2, $3, TRUE, now())
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(new_user.email)
    .bind(new_user.full_name)
    .bind(new_user.photo_url)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}

/// Gets a single user by their ID. The user may not exist.
pub async fn get_user_by_id(conn: &mut DbConn, id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}

/// Gets a single user by their email address. The user may not exist.
pub async fn get_user_by_email(conn: &mut DbConn, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE email = $1
        "#
    ))
    .bind(email)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}

/// Stamps the last-login marker for an existing user.
pub async fn touch_last_login(conn: &mut DbConn, id: i64) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET last_login = now()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}

/// Applies a partial profile update, stamping updated_at.
pub async fn update_profile(conn: &mut DbConn, id: i64, patch: UpdateProfile) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET full_name = COALESCE($1, full_name),
            photo_url = COALESCE($2, photo_url),
            updated_at = now()
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(patch.full_name)
    .bind(patch.photo_url)
    .bind(id)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}
