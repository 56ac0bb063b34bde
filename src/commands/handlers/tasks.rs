//! Task command handlers
//!
//! Handles: add_task, delete_task, list_tasks, search_tasks
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation over TaskService

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{info, warn};
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_string_option;
use crate::core::{ErrorCode, TaskError};
use crate::features::reminders::notifier::{embed_timestamp, format_due_status};
use crate::features::tasks::{CreateTaskRequest, Task};

const ADDED_COLOR: u32 = 0x4CAF50;
const DELETED_COLOR: u32 = 0xF44336;
const LIST_COLOR: u32 = 0x2196F3;

// Discord rejects embeds with more than 25 fields
const MAX_LIST_FIELDS: usize = 25;

/// Handler for task management commands
pub struct TaskCommandHandler;

#[async_trait]
impl SlashCommandHandler for TaskCommandHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["add_task", "delete_task", "list_tasks", "search_tasks"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "add_task" => self.handle_add_task(&ctx, serenity_ctx, command).await,
            "delete_task" => self.handle_delete_task(&ctx, serenity_ctx, command).await,
            "list_tasks" => self.handle_list_tasks(&ctx, serenity_ctx, command).await,
            "search_tasks" => self.handle_search_tasks(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl TaskCommandHandler {
    /// Handle /add_task - register a new task
    async fn handle_add_task(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let name = get_string_option(&command.data.options, "name")
            .ok_or_else(|| anyhow::anyhow!("Missing name parameter"))?;
        let subject = get_string_option(&command.data.options, "subject")
            .ok_or_else(|| anyhow::anyhow!("Missing subject parameter"))?;
        let due_date_str = get_string_option(&command.data.options, "due_date")
            .ok_or_else(|| anyhow::anyhow!("Missing due_date parameter"))?;
        let description = get_string_option(&command.data.options, "description");

        let Some(due_date) = parse_due_date(&due_date_str) else {
            return respond_text(
                serenity_ctx,
                command,
                "❌ Invalid date format. Use `YYYY-MM-DD` or `YYYY-MM-DD HH:MM` (e.g. `2025-06-25`).",
                true,
            )
            .await;
        };

        let request = CreateTaskRequest {
            name,
            subject,
            description,
            due_date,
            registered_by: command.user.id.to_string(),
        };

        match ctx.task_service.add_task(request).await {
            Ok(task) => {
                info!(
                    "Task {} registered by user {} (due {})",
                    task.id, task.registered_by, task.due_date
                );

                let mut embed = CreateEmbed::default();
                embed.color(ADDED_COLOR);
                embed.title("✅ Task added");
                embed.field("📚 Subject", &task.subject, true);
                embed.field("📝 Task", &task.name, true);
                embed.field("📅 Due", task.due_date.format("%Y-%m-%d %H:%M UTC"), true);
                if let Some(description) = &task.description {
                    embed.field("📄 Details", description, false);
                }
                embed.footer(|f| f.text(format!("ID: {}", task.id)));
                embed.timestamp(embed_timestamp(ctx.clock.now()));

                respond_embed(serenity_ctx, command, embed).await
            }
            Err(e) => respond_task_error(serenity_ctx, command, &e).await,
        }
    }

    /// Handle /delete_task - delete an owned task by id
    async fn handle_delete_task(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let task_id = get_string_option(&command.data.options, "task_id")
            .ok_or_else(|| anyhow::anyhow!("Missing task_id parameter"))?;
        let user_id = command.user.id.to_string();

        // Fetch first so the confirmation can show what was deleted
        let task = match ctx.task_service.get_task_by_id(&task_id).await {
            Ok(Some(task)) => task,
            Ok(None) => {
                return respond_text(
                    serenity_ctx,
                    command,
                    "❌ No task found with that ID.",
                    true,
                )
                .await;
            }
            Err(e) => return respond_task_error(serenity_ctx, command, &e).await,
        };

        match ctx.task_service.delete_task(&task_id, &user_id).await {
            Ok(true) => {
                info!("Task {task_id} deleted by user {user_id}");

                let mut embed = CreateEmbed::default();
                embed.color(DELETED_COLOR);
                embed.title("🗑️ Task deleted");
                embed.field("📚 Subject", &task.subject, true);
                embed.field("📝 Task", &task.name, true);
                embed.field("📅 Due", task.due_date.format("%Y-%m-%d %H:%M UTC"), true);
                embed.timestamp(embed_timestamp(ctx.clock.now()));

                respond_embed(serenity_ctx, command, embed).await
            }
            Ok(false) => {
                warn!("Delete of task {task_id} by user {user_id} was refused by storage");
                respond_text(serenity_ctx, command, "❌ Failed to delete the task.", true).await
            }
            Err(e) => respond_task_error(serenity_ctx, command, &e).await,
        }
    }

    /// Handle /list_tasks - list tasks with an optional urgency filter
    async fn handle_list_tasks(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let filter =
            get_string_option(&command.data.options, "filter").unwrap_or_else(|| "all".to_string());
        let subject = get_string_option(&command.data.options, "subject");

        let result = match filter.as_str() {
            "today" => ctx.task_service.get_tasks_due_in_days(0).await,
            "tomorrow" => ctx.task_service.get_tasks_due_in_days(1).await,
            "this_week" => ctx.task_service.get_tasks_due_in_days(7).await,
            "overdue" => ctx.task_service.get_overdue_tasks().await,
            _ => ctx.task_service.list_active_tasks().await,
        };

        let mut tasks = match result {
            Ok(tasks) => tasks,
            Err(e) => return respond_task_error(serenity_ctx, command, &e).await,
        };

        if let Some(subject) = &subject {
            let needle = subject.trim().to_lowercase();
            tasks.retain(|t| t.subject.to_lowercase().contains(&needle));
        }

        if tasks.is_empty() {
            return respond_text(
                serenity_ctx,
                command,
                "📋 No tasks match. Register one with `/add_task`!",
                false,
            )
            .await;
        }

        let title = match filter.as_str() {
            "today" => "📋 Tasks due today",
            "tomorrow" => "📋 Tasks due tomorrow",
            "this_week" => "📋 Tasks due this week",
            "overdue" => "📋 Overdue tasks",
            _ => "📋 All registered tasks",
        };
        let embed = build_task_list_embed(title, &tasks, ctx.clock.now());
        respond_embed(serenity_ctx, command, embed).await
    }

    /// Handle /search_tasks - keyword search over task names
    async fn handle_search_tasks(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let keyword = get_string_option(&command.data.options, "keyword")
            .ok_or_else(|| anyhow::anyhow!("Missing keyword parameter"))?;

        match ctx.task_service.search_tasks_by_name(&keyword).await {
            Ok(tasks) if tasks.is_empty() => {
                respond_text(
                    serenity_ctx,
                    command,
                    &format!("📋 No tasks matched `{}`.", keyword.trim()),
                    false,
                )
                .await
            }
            Ok(tasks) => {
                let title = format!("🔎 Tasks matching \"{}\"", keyword.trim());
                let embed = build_task_list_embed(&title, &tasks, ctx.clock.now());
                respond_embed(serenity_ctx, command, embed).await
            }
            Err(e) => respond_task_error(serenity_ctx, command, &e).await,
        }
    }
}

/// Parse a due-date argument
///
/// Accepts `YYYY-MM-DD HH:MM` or `YYYY-MM-DD`; a bare date means end of that
/// calendar day.
pub fn parse_due_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Some(dt.and_utc());
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc())
}

/// Render a task list embed, one field per task
fn build_task_list_embed(title: &str, tasks: &[Task], now: DateTime<Utc>) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.color(LIST_COLOR);
    embed.title(title);
    embed.timestamp(embed_timestamp(now));

    for task in tasks.iter().take(MAX_LIST_FIELDS) {
        let mut value = format!(
            "📅 {} ({})\n🆔 {}",
            task.due_date.format("%Y-%m-%d %H:%M UTC"),
            format_due_status(task.days_until_due(now)),
            task.id
        );
        if let Some(description) = &task.description {
            value.push_str(&format!("\n📝 {description}"));
        }
        embed.field(format!("{} - {}", task.subject, task.name), value, false);
    }

    if tasks.len() > MAX_LIST_FIELDS {
        embed.footer(|f| {
            f.text(format!(
                "Showing {MAX_LIST_FIELDS} of {} tasks",
                tasks.len()
            ))
        });
    }

    embed
}

/// Map a typed task error to a user-facing ephemeral message
async fn respond_task_error(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    error: &TaskError,
) -> Result<()> {
    let message = match error.code {
        ErrorCode::TaskNotFound => "❌ The specified task was not found.".to_string(),
        ErrorCode::PermissionDenied => {
            "❌ You can only delete tasks you registered yourself.".to_string()
        }
        ErrorCode::DatabaseError => "❌ Storage error, please try again later.".to_string(),
        _ => format!("❌ {}", error.message),
    };
    respond_text(serenity_ctx, command, &message, true).await
}

async fn respond_text(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
    ephemeral: bool,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|msg| {
                    msg.content(content);
                    if ephemeral {
                        msg.ephemeral(true);
                    }
                    msg
                })
        })
        .await?;
    Ok(())
}

async fn respond_embed(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    embed: CreateEmbed,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|msg| msg.set_embed(embed))
        })
        .await?;
    Ok(())
}
