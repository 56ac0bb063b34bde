//! Notification delivery
//!
//! The [`Notifier`] contract accepts a pre-ordered task batch and delivers it
//! as a side effect. Delivery is best-effort: the signature carries no typed
//! delivery error, and the Discord implementation logs failures locally.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.2.0: Embed timestamps derive from the injected clock instant
//! - 1.1.0: Class-ended prompt embed for the /class_ended command
//! - 1.0.0: Initial Discord notifier with per-task embed fields

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info};
use serenity::builder::CreateEmbed;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use serenity::model::Timestamp;
use std::sync::Arc;

use crate::core::Clock;
use crate::features::tasks::Task;

const REMINDER_COLOR: u32 = 0xFF6B35;
const CLASS_ENDED_COLOR: u32 = 0x4CAF50;

/// Outbound delivery of urgent-task batches
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a pre-ordered batch of tasks to a destination channel
    async fn send_reminder_batch(&self, destination: &str, tasks: &[Task]);
}

/// Notifier that posts rich embeds via the Discord HTTP API
pub struct DiscordNotifier {
    http: Arc<Http>,
    clock: Arc<dyn Clock>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>, clock: Arc<dyn Clock>) -> Self {
        Self { http, clock }
    }

    fn parse_channel(destination: &str) -> Option<ChannelId> {
        match destination.trim().parse::<u64>() {
            Ok(id) => Some(ChannelId(id)),
            Err(_) => {
                error!("Invalid notification channel id: {destination}");
                None
            }
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send_reminder_batch(&self, destination: &str, tasks: &[Task]) {
        if tasks.is_empty() {
            return;
        }
        let Some(channel) = Self::parse_channel(destination) else {
            return;
        };

        let embed = build_reminder_embed(tasks, self.clock.now());
        match channel
            .send_message(&self.http, |m| m.set_embed(embed))
            .await
        {
            Ok(_) => info!(
                "Sent reminder batch with {} task(s) to channel {channel}",
                tasks.len()
            ),
            Err(e) => error!("Failed to send reminder batch to channel {channel}: {e}"),
        }
    }
}

/// Embed timestamp for an injected-clock instant
pub fn embed_timestamp(now: DateTime<Utc>) -> Timestamp {
    Timestamp::from_unix_timestamp(now.timestamp()).unwrap_or_else(|_| Timestamp::now())
}

/// Build the reminder embed: one field per task, in batch order
pub fn build_reminder_embed(tasks: &[Task], now: DateTime<Utc>) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.color(REMINDER_COLOR);
    embed.title("📚 Assignment Reminder");
    embed.description("You have assignments with approaching deadlines!");
    embed.timestamp(embed_timestamp(now));

    for task in tasks {
        let mut value = format!(
            "📅 {} ({})",
            task.due_date.format("%Y-%m-%d %H:%M UTC"),
            format_due_status(task.days_until_due(now))
        );
        if let Some(description) = &task.description {
            value.push_str(&format!("\n📝 {description}"));
        }
        embed.field(format!("{} - {}", task.subject, task.name), value, false);
    }

    embed
}

/// Build the end-of-class prompt embed
pub fn build_class_ended_embed(now: DateTime<Utc>) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.color(CLASS_ENDED_COLOR);
    embed.title("🎓 Class Ended");
    embed.description(
        "Class is over! If new assignments were handed out, register them with `/add_task`.",
    );
    embed.timestamp(embed_timestamp(now));
    embed
}

/// Human-readable urgency for a ceiling day count
pub fn format_due_status(days_until_due: i64) -> String {
    match days_until_due {
        0 => "due today!".to_string(),
        1 => "due tomorrow!".to_string(),
        d if d < 0 => {
            let days = -d;
            format!("{} day{} overdue", days, if days == 1 { "" } else { "s" })
        }
        d => format!("{d} days left"),
    }
}
