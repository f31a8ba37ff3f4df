use chrono::{DateTime, Duration, Utc};

use crate::{
    error::{Error, Result},
    models::assignments::{
        Assignment, AssignmentStatRow, CreateAssignment, SortBy, SortOrder, UpdateAssignment,
    },
    services::due_status::{DUE_SOON_DAYS, DueStatus},
};

use crate::DbConn;

const ASSIGNMENT_COLUMNS: &str =
    "id, title, description, prompt, due_date, course_id, created_at, updated_at";

/// Parsed filter for the user-scoped assignment listing.
///
/// All temporal predicates are evaluated against `now` so the SQL-side
/// filtering agrees exactly with [`due_status::bucket`](crate::services::due_status::bucket).
#[derive(Debug, Clone)]
pub struct AssignmentFilter {
    pub status: Option<DueStatus>,
    pub course_id: Option<i64>,
    pub search: Option<String>,
    pub sort_by: SortBy,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
    pub now: DateTime<Utc>,
}

/// Creates a new assignment in the given course.
pub async fn create_assignment(
    conn: &mut DbConn,
    assignment: CreateAssignment,
) -> Result<Assignment> {
    let assignment = sqlx::query_as::<_, Assignment>(&format!(
        r#"
        INSERT INTO assignments (title, description, prompt, due_date, course_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {ASSIGNMENT_COLUMNS}
        "#
    ))
    .bind(assignment.title)
    .bind(assignment.description.unwrap_or_default())
    .bind(assignment.prompt)
    .bind(assignment.due_date)
    .bind(assignment.course_id)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(assignment)
}

/// Gets a single assignment by its ID. The assignment may not exist.
pub async fn get_assignment_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Assignment>> {
    let assignment = sqlx::query_as::<_, Assignment>(&format!(
        r#"
        SELECT {ASSIGNMENT_COLUMNS}
        FROM assignments
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(assignment)
}

/// Lists all assignments of a course, due date ascending.
pub async fn get_assignments_by_course(conn: &mut DbConn, course_id: i64) -> Result<Vec<Assignment>> {
    let assignments = sqlx::query_as::<_, Assignment>(&format!(
        r#"
        SELECT {ASSIGNMENT_COLUMNS}
        FROM assignments
        WHERE course_id = $1
        ORDER BY due_date ASC
        "#
    ))
    .bind(course_id)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(assignments)
}

/// Lists assignments across all courses owned by a user, applying the
/// filter, search, sort, and pagination rules.
///
/// The base set is always restricted to the owner's courses; pagination is
/// applied after filtering and sorting.
pub async fn list_for_user(
    conn: &mut DbConn,
    user_id: i64,
    filter: &AssignmentFilter,
) -> Result<Vec<Assignment>> {
    let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        "SELECT a.id, a.title, a.description, a.prompt, a.due_date, \
         a.course_id, a.created_at, a.updated_at \
         FROM assignments a \
         JOIN courses c ON c.id = a.course_id \
         WHERE c.user_id = ",
    );
    qb.push_bind(user_id);

    if let Some(course_id) = filter.course_id {
        qb.push(" AND a.course_id = ").push_bind(course_id);
    }

    if let Some(search) = &filter.search {
        qb.push(" AND a.title ILIKE ")
            .push_bind(format!("%{}%", search));
    }

    if let Some(status) = filter.status {
        let soon_threshold = filter.now + Duration::days(DUE_SOON_DAYS);
        match status {
            DueStatus::Overdue => {
                qb.push(" AND a.due_date < ").push_bind(filter.now);
            }
            DueStatus::DueSoon => {
                qb.push(" AND a.due_date >= ").push_bind(filter.now);
                qb.push(" AND a.due_date <= ").push_bind(soon_threshold);
            }
            DueStatus::Upcoming => {
                qb.push(" AND a.due_date > ").push_bind(soon_threshold);
            }
        }
    }

    // Sort columns come from a fixed whitelist, never from user input
    let sort_column = match filter.sort_by {
        SortBy::DueDate => "a.due_date",
        SortBy::Title => "a.title",
        SortBy::CreatedAt => "a.created_at",
    };
    let direction = match filter.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    qb.push(" ORDER BY ")
        .push(sort_column)
        .push(" ")
        .push(direction);

    qb.push(" LIMIT ").push_bind(filter.limit);
    qb.push(" OFFSET ").push_bind(filter.offset);

    let assignments = qb
        .build_query_as::<Assignment>()
        .fetch_all(conn)
        .await
        .map_err(Error::Sqlx)?;

    Ok(assignments)
}

/// Upcoming assignments across the user's courses, soonest first.
pub async fn upcoming_for_user(
    conn: &mut DbConn,
    user_id: i64,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<Assignment>> {
    let assignments = sqlx::query_as::<_, Assignment>(
        r#"
        SELECT a.id, a.title, a.description, a.prompt, a.due_date,
               a.course_id, a.created_at, a.updated_at
        FROM assignments a
        JOIN courses c ON c.id = a.course_id
        WHERE c.user_id = $1 AND a.due_date > $2
        ORDER BY a.due_date ASC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(now)
    .bind(limit)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(assignments)
}

/// Overdue assignments across the user's courses, most recently due first.
pub async fn overdue_for_user(
    conn: &mut DbConn,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<Assignment>> {
    let assignments = sqlx::query_as::<_, Assignment>(
        r#"
        SELECT a.id, a.title, a.description, a.prompt, a.due_date,
               a.course_id, a.created_at, a.updated_at
        FROM assignments a
        JOIN courses c ON c.id = a.course_id
        WHERE c.user_id = $1 AND a.due_date < $2
        ORDER BY a.due_date DESC
        "#,
    )
    .bind(user_id)
    .bind(now)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(assignments)
}

/// Due dates plus owning-course names for every assignment of a user,
/// the input to the single-pass statistics aggregation.
pub async fn stat_rows_for_user(conn: &mut DbConn, user_id: i64) -> Result<Vec<AssignmentStatRow>> {
    let rows = sqlx::query_as::<_, AssignmentStatRow>(
        r#"
        SELECT a.due_date, c.name AS course_name
        FROM assignments a
        JOIN courses c ON c.id = a.course_id
        WHERE c.user_id = $1
        ORDER BY c.created_at DESC, a.due_date ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(rows)
}

/// Counts the assignments across all courses owned by a user.
pub async fn count_by_owner(conn: &mut DbConn, user_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM assignments a
        JOIN courses c ON c.id = a.course_id
        WHERE c.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(count)
}

/// Applies a partial update to an existing assignment, stamping updated_at.
pub async fn update_assignment(
    conn: &mut DbConn,
    id: i64,
    patch: UpdateAssignment,
) -> Result<Assignment> {
    let assignment = sqlx::query_as::<_, Assignment>(&format!(
        r#"
        UPDATE assignments
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            prompt = COALESCE($3, prompt),
            due_date = COALESCE($4, due_date),
            updated_at = now()
        WHERE id = $5
        RETURNING {ASSIGNMENT_COLUMNS}
        "#
    ))
    .bind(patch.title)
    .bind(patch.description)
    .bind(patch.prompt)
    .bind(patch.due_date)
    .bind(id)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(assignment)
}

/// Deletes an assignment by its ID.
pub async fn delete_assignment(conn: &mut DbConn, id: i64) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM assignments
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
