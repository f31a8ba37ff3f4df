use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::services::due_status;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub due_date: DateTime<Utc>,
    pub course_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignment {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub prompt: String,
    #[serde(deserialize_with = "lenient_datetime::deserialize")]
    pub due_date: DateTime<Utc>,
    pub course_id: i64,
}

/// Partial assignment update; only supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAssignment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime::deserialize_optional")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Sort keys accepted by the assignment listing. Unrecognized values fall
/// back to the default rather than failing the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    DueDate,
    Title,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Query parameters for `GET /assignments`.
///
/// Filter values arrive as raw strings; parsing rules live in the service
/// layer (status is strict, sort keys are lenient).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentListQuery {
    pub status: Option<String>,
    pub course_id: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Assignment enriched with derived temporal fields for responses.
///
/// `is_overdue` and `days_until_due` are never stored; they are recomputed
/// against the request's reference time.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub due_date: DateTime<Utc>,
    pub course_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_overdue: bool,
    pub days_until_due: Option<i64>,
}

impl AssignmentView {
    pub fn new(assignment: Assignment, now: DateTime<Utc>) -> Self {
        let is_overdue = assignment.due_date < now;
        let days_until_due = due_status::days_until_due(assignment.due_date, now);
        Self {
            id: assignment.id,
            title: assignment.title,
            description: assignment.description,
            prompt: assignment.prompt,
            due_date: assignment.due_date,
            course_id: assignment.course_id,
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
            is_overdue,
            days_until_due,
        }
    }
}

/// Row used by the statistics aggregation: one assignment joined with the
/// name of its owning course.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AssignmentStatRow {
    pub due_date: DateTime<Utc>,
    pub course_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseCount {
    pub course_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentStats {
    pub total: i64,
    pub overdue: i64,
    pub due_soon: i64,
    pub upcoming: i64,
    pub by_course: Vec<CourseCount>,
}

/// Deserializes due dates, interpreting inputs without a zone as UTC.
mod lenient_datetime {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, de};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) => parse(&s).map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }

    fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        // No zone designator: assume UTC
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Utc.from_utc_datetime(&naive))
            .map_err(|_| format!("invalid datetime: {}", raw))
    }
}
