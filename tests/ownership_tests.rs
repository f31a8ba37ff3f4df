mod common;

use chrono::{Duration, Utc};
use common::TestDb;
use courseboard::Error;
use courseboard::models::assignments::CreateAssignment;
use courseboard::models::courses::CreateCourse;
use courseboard::models::users::User;
use courseboard::queries;
use courseboard::services::ownership::{require_owned_assignment, require_owned_course};
use courseboard::services::users::resolve_or_create;

async fn make_user(test_db: &TestDb, conn: &mut sqlx::PgConnection) -> User {
    let email = test_db.generate_test_email();
    resolve_or_create(conn, test_db.generate_identity(&email, None))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_owned_course_is_returned() {
    let test_db = TestDb::new("test_owned_course_is_returned").await;
    let mut conn = test_db.get_connection().await;

    let user = make_user(&test_db, &mut conn).await;
    let course = queries::courses::create_course(
        &mut conn,
        user.id,
        CreateCourse {
            name: "Algorithms".to_string(),
            term: "Fall 2026".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let found = require_owned_course(&mut conn, user.id, course.id)
        .await
        .unwrap();
    assert_eq!(found.id, course.id);
}

#[tokio::test]
async fn test_missing_course_is_not_found() {
    let test_db = TestDb::new("test_missing_course_is_not_found").await;
    let mut conn = test_db.get_connection().await;

    let user = make_user(&test_db, &mut conn).await;

    let result = require_owned_course(&mut conn, user.id, i64::MAX).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_other_users_course_is_indistinguishable_from_missing() {
    let test_db = TestDb::new("test_other_users_course_is_indistinguishable_from_missing").await;
    let mut conn = test_db.get_connection().await;

    let owner = make_user(&test_db, &mut conn).await;
    let intruder = make_user(&test_db, &mut conn).await;

    let course = queries::courses::create_course(
        &mut conn,
        owner.id,
        CreateCourse {
            name: "Private Course".to_string(),
            term: "Fall 2026".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let owned_err = require_owned_course(&mut conn, intruder.id, course.id)
        .await
        .unwrap_err();
    let missing_err = require_owned_course(&mut conn, intruder.id, i64::MAX)
        .await
        .unwrap_err();

    // Not-owned must collapse to the same error as non-existent
    assert_eq!(owned_err.to_string(), missing_err.to_string());
}

#[tokio::test]
async fn test_assignment_ownership_is_transitive_through_course() {
    let test_db = TestDb::new("test_assignment_ownership_is_transitive_through_course").await;
    let mut conn = test_db.get_connection().await;

    let owner = make_user(&test_db, &mut conn).await;
    let intruder = make_user(&test_db, &mut conn).await;

    let course = queries::courses::create_course(
        &mut conn,
        owner.id,
        CreateCourse {
            name: "Databases".to_string(),
            term: "Fall 2026".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let assignment = queries::assignments::create_assignment(
        &mut conn,
        CreateAssignment {
            title: "Project 1".to_string(),
            description: None,
            prompt: "Build a B-tree".to_string(),
            due_date: Utc::now() + Duration::days(14),
            course_id: course.id,
        },
    )
    .await
    .unwrap();

    let found = require_owned_assignment(&mut conn, owner.id, assignment.id)
        .await
        .unwrap();
    assert_eq!(found.id, assignment.id);

    let result = require_owned_assignment(&mut conn, intruder.id, assignment.id).await;
    match result {
        Err(Error::NotFound(msg)) => assert_eq!(msg, "Assignment not found"),
        other => panic!("Expected NotFound, got {:?}", other.map(|a| a.id)),
    }
}
