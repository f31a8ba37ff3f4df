use crate::{
    error::{Error, Result},
    models::courses::{Course, CreateCourse, UpdateCourse},
};

use crate::DbConn;

const COURSE_COLUMNS: &str = "id, name, term, description, user_id, created_at, updated_at";

/// Creates a new course owned by the given user.
pub async fn create_course(
    conn: &mut DbConn,
    user_id: i64,
    course: CreateCourse,
) -> Result<Course> {
    let course = sqlx::query_as::<_, Course>(&format!(
        r#"
        INSERT INTO courses (name, term, description, user_id)
        VALUES ($1, $2, $3, $4)
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(course.name)
    .bind(course.term)
    .bind(course.description.unwrap_or_default())
    .bind(user_id)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(course)
}

/// Gets a single course by its ID. The course may not exist.
pub async fn get_course_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Course>> {
    let course = sqlx::query_as::<_, Course>(&format!(
        r#"
        SELECT {COURSE_COLUMNS}
        FROM courses
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(course)
}

/// Lists all courses owned by a user, newest first.
pub async fn get_courses_by_owner(conn: &mut DbConn, user_id: i64) -> Result<Vec<Course>> {
    let courses = sqlx::query_as::<_, Course>(&format!(
        r#"
        SELECT {COURSE_COLUMNS}
        FROM courses
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(courses)
}

/// Counts the courses owned by a user.
pub async fn count_by_owner(conn: &mut DbConn, user_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM courses
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(count)
}

/// Applies a partial update to an existing course, stamping updated_at.
pub async fn update_course(conn: &mut DbConn, id: i64, patch: UpdateCourse) -> Result<Course> {
    let course = sqlx::query_as::<_, Course>(&format!(
        r#"
        UPDATE courses
        SET name = COALESCE($1, name),
            term = COALESCE($2, term),
            description = COALESCE($3, description),
            updated_at = now()
        WHERE id = $4
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(patch.name)
    .bind(patch.term)
    .bind(patch.description)
    .bind(id)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(course)
}

/// Deletes a course by its ID.
pub async fn delete_course(conn: &mut DbConn, id: i64) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM courses
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(rows_affected)
}
