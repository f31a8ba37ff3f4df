//! Shared HTTP test helper functions
//!
//! Common flows used across multiple test files: registering a user,
//! creating courses and assignments through the API.

use crate::common::TestApp;

/// Registers a user through the API and returns a bearer token for them.
pub async fn register(app: &TestApp, email: &str, name: Option<&str>) -> String {
    let token = app.token_for(email, name);

    let response = app
        .client
        .post(app.url("/api/v1/auth/register"))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);

    token
}

/// Creates a course as an authenticated user, returning its id.
pub async fn create_course(app: &TestApp, token: &str, name: &str, term: &str) -> i64 {
    let response = app
        .client
        .post(app.url("/api/v1/courses"))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "name": name,
            "term": term,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    body["course"]["id"].as_i64().unwrap()
}

/// Creates an assignment in a course, returning its id.
pub async fn create_assignment(
    app: &TestApp,
    token: &str,
    course_id: i64,
    title: &str,
    due_date: &str,
) -> i64 {
    let response = app
        .client
        .post(app.url("/api/v1/assignments"))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "title": title,
            "prompt": "Write it up",
            "due_date": due_date,
            "course_id": course_id,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    body["assignment"]["id"].as_i64().unwrap()
}
