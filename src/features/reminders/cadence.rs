//! Reminder cadences
//!
//! Fixed recurring schedules made explicit as a value type instead of an
//! ambient cron string, so the next fire instant is a pure computation.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Daily and weekly cadences with pure next-fire calculation

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

/// A fixed recurring schedule for a reminder trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Once per calendar day at the given UTC time
    Daily { hour: u32, minute: u32 },
    /// Once per week on the given weekday at the given UTC time
    Weekly {
        weekday: Weekday,
        hour: u32,
        minute: u32,
    },
}

impl Cadence {
    /// The next occurrence strictly after `now`
    pub fn next_fire_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match *self {
            Cadence::Daily { hour, minute } => {
                let candidate = at_time(now, hour, minute);
                if candidate > now {
                    candidate
                } else {
                    at_time(now + Duration::days(1), hour, minute)
                }
            }
            Cadence::Weekly {
                weekday,
                hour,
                minute,
            } => {
                for offset in 0..=7 {
                    let day = now + Duration::days(offset);
                    let candidate = at_time(day, hour, minute);
                    if day.weekday() == weekday && candidate > now {
                        return candidate;
                    }
                }
                // offset 7 always lands on `weekday` strictly in the future
                unreachable!("weekly cadence must fire within seven days")
            }
        }
    }
}

fn at_time(day: DateTime<Utc>, hour: u32, minute: u32) -> DateTime<Utc> {
    day.date_naive()
        .and_hms_opt(hour, minute, 0)
        .expect("cadence hour/minute validated at config load")
        .and_utc()
}
