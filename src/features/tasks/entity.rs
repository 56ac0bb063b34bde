//! Task entity
//!
//! Immutable record of a deadline obligation. All date-relation queries take
//! an explicit `now` so callers control the reference instant.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with calendar-day and ceiling-day queries

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// A deadline obligation registered by a user
///
/// Tasks are value objects: once persisted they are never mutated in place.
/// `id` and `created_at` are assigned by the repository at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub registered_by: String,
    pub created_at: DateTime<Utc>,
}

/// Task data accepted by the repository's `create`
///
/// Everything except the repository-assigned `id` and `created_at`.
/// Fields are already validated and trimmed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub subject: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub registered_by: String,
}

impl Task {
    /// Whether the deadline has passed at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.due_date
    }

    /// Whether the due date falls on the same calendar day as `now`
    ///
    /// Calendar-day comparison, not a 24-hour window.
    pub fn is_due_today(&self, now: DateTime<Utc>) -> bool {
        self.due_date.date_naive() == now.date_naive()
    }

    /// Whether the due date falls on the calendar day after `now`
    pub fn is_due_tomorrow(&self, now: DateTime<Utc>) -> bool {
        self.due_date.date_naive() == (now + Duration::days(1)).date_naive()
    }

    /// Whole days until the deadline, rounding fractional days up
    ///
    /// A task due 36 hours out reports 2; exactly 24 hours reports 1.
    /// Past deadlines report zero or negative values.
    pub fn days_until_due(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.due_date - now).num_milliseconds();
        let mut days = millis.div_euclid(MILLIS_PER_DAY);
        if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
            days += 1;
        }
        days
    }

    /// Whether `user_id` owns this task
    pub fn can_be_deleted_by(&self, user_id: &str) -> bool {
        self.registered_by == user_id
    }
}
