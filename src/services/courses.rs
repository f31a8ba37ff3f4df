use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::courses::{Course, CreateCourse, UpdateCourse},
    queries::courses,
    services::ownership,
    validation,
};

/// Lists all courses owned by the user, newest first.
pub async fn list_courses(conn: &mut DbConn, user_id: i64) -> Result<Vec<Course>> {
    courses::get_courses_by_owner(conn, user_id).await
}

/// Gets a single course, scoped to the acting user.
pub async fn get_course(conn: &mut DbConn, user_id: i64, course_id: i64) -> Result<Course> {
    ownership::require_owned_course(conn, user_id, course_id).await
}

/// Creates a new course owned by the acting user.
pub async fn create_course(
    conn: &mut DbConn,
    user_id: i64,
    request: CreateCourse,
) -> Result<Course> {
    validation::validate_required_string(&request.name, "Course name")?;
    validation::validate_length(&request.name, "Course name", 200)?;
    validation::validate_required_string(&request.term, "Term")?;
    validation::validate_length(&request.term, "Term", 50)?;
    if let Some(description) = &request.description {
        validation::validate_length(description, "Description", 1000)?;
    }

    let course = courses::create_course(conn, user_id, request)
        .await
        .map_err(|e| {
            if e.is_unique_violation() || e.is_foreign_key_violation() {
                Error::Validation("Failed to create course".to_string())
            } else {
                e
            }
        })?;

    tracing::info!(course_id = course.id, user_id, "course created");
    Ok(course)
}

/// Applies a partial update to a course the acting user owns.
pub async fn update_course(
    conn: &mut DbConn,
    user_id: i64,
    course_id: i64,
    patch: UpdateCourse,
) -> Result<Course> {
    ownership::require_owned_course(conn, user_id, course_id).await?;

    if let Some(name) = &patch.name {
        validation::validate_required_string(name, "Course name")?;
        validation::validate_length(name, "Course name", 200)?;
    }
    if let Some(term) = &patch.term {
        validation::validate_required_string(term, "Term")?;
        validation::validate_length(term, "Term", 50)?;
    }
    if let Some(description) = &patch.description {
        validation::validate_length(description, "Description", 1000)?;
    }

    let course = courses::update_course(conn, course_id, patch).await?;
    tracing::info!(course_id, user_id, "course updated");
    Ok(course)
}

/// Deletes a course the acting user owns, cascading to its assignments.
pub async fn delete_course(conn: &mut DbConn, user_id: i64, course_id: i64) -> Result<()> {
    ownership::require_owned_course(conn, user_id, course_id).await?;

    courses::delete_course(conn, course_id).await.map_err(|e| {
        if e.is_foreign_key_violation() {
            Error::Conflict("Cannot delete course with existing assignments".to_string())
        } else {
            e
        }
    })?;

    tracing::info!(course_id, user_id, "course deleted");
    Ok(())
}
