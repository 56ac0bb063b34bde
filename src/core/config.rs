//! Environment-driven configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Reminder cadence knobs (hour/minute/weekday) with defaults
//! - 1.0.0: Initial implementation with required-variable validation

use anyhow::{anyhow, Result};
use chrono::Weekday;

/// Bot configuration loaded from environment variables
///
/// Required: `DISCORD_TOKEN`, `TASK_REMINDER_CHANNEL_ID`,
/// `CLASS_UPDATES_CHANNEL_ID`. Everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Guild to register commands against; global registration when unset
    pub guild_id: Option<u64>,
    pub database_path: String,
    pub reminder_channel_id: String,
    pub class_updates_channel_id: String,
    pub daily_reminder_hour: u32,
    pub daily_reminder_minute: u32,
    pub weekly_reminder_weekday: Weekday,
    pub log_level: String,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Missing required variables are reported together in one error.
    pub fn from_env() -> Result<Self> {
        let required = [
            "DISCORD_TOKEN",
            "TASK_REMINDER_CHANNEL_ID",
            "CLASS_UPDATES_CHANNEL_ID",
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|name| std::env::var(name).map_or(true, |v| v.trim().is_empty()))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(anyhow!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ));
        }

        let guild_id = match std::env::var("GUILD_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| anyhow!("GUILD_ID must be a numeric Discord id: {raw}"))?,
            ),
            _ => None,
        };

        Ok(Config {
            discord_token: std::env::var("DISCORD_TOKEN")?,
            guild_id,
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "tasks.db".to_string()),
            reminder_channel_id: std::env::var("TASK_REMINDER_CHANNEL_ID")?,
            class_updates_channel_id: std::env::var("CLASS_UPDATES_CHANNEL_ID")?,
            daily_reminder_hour: parse_or_default("DAILY_REMINDER_HOUR", 9, 0..=23)?,
            daily_reminder_minute: parse_or_default("DAILY_REMINDER_MINUTE", 0, 0..=59)?,
            weekly_reminder_weekday: parse_weekday_or_default("WEEKLY_REMINDER_WEEKDAY")?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_or_default(
    name: &str,
    default: u32,
    range: std::ops::RangeInclusive<u32>,
) -> Result<u32> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            let value = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("{name} must be a number, got: {raw}"))?;
            if !range.contains(&value) {
                return Err(anyhow!(
                    "{name} must be between {} and {}, got: {value}",
                    range.start(),
                    range.end()
                ));
            }
            Ok(value)
        }
        _ => Ok(default),
    }
}

fn parse_weekday_or_default(name: &str) -> Result<Weekday> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<Weekday>()
            .map_err(|_| anyhow!("{name} must be a weekday name like 'mon', got: {raw}")),
        _ => Ok(Weekday::Mon),
    }
}
