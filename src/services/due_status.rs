//! Temporal classification of assignment due dates.
//!
//! Every status-bearing response, filter, and aggregate in the tracker goes
//! through this module so the three buckets stay consistent across call
//! sites.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Horizon separating "due soon" from "upcoming".
pub const DUE_SOON_DAYS: i64 = 7;

/// One of three mutually exclusive temporal classifications of a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Upcoming,
}

/// Maps a due date to its status bucket relative to `now`.
///
/// The buckets partition all instants with no gap or overlap:
/// `due == now` and `due == now + 7 days` are both `DueSoon`.
pub fn bucket(due_date: DateTime<Utc>, now: DateTime<Utc>) -> DueStatus {
    if due_date < now {
        DueStatus::Overdue
    } else if due_date <= now + Duration::days(DUE_SOON_DAYS) {
        DueStatus::DueSoon
    } else {
        DueStatus::Upcoming
    }
}

/// Whole days remaining until the due date, floor of the delta.
///
/// Present only when non-negative; an exactly-due item reports 0.
pub fn days_until_due(due_date: DateTime<Utc>, now: DateTime<Utc>) -> Option<i64> {
    let days = (due_date - now).num_days();
    if due_date >= now && days >= 0 {
        Some(days)
    } else {
        None
    }
}
