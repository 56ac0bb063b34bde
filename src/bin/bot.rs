use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use duebot::commands::{
    create_all_handlers, register_global_commands, register_guild_commands, CommandContext,
    CommandRegistry,
};
use duebot::core::{Clock, Config, SystemClock};
use duebot::database::{Database, SqliteTaskRepository};
use duebot::features::reminders::{Cadence, DiscordNotifier, ReminderScheduler};
use duebot::features::tasks::TaskService;

struct Handler {
    registry: CommandRegistry,
    context: Arc<CommandContext>,
    task_service: Arc<TaskService>,
    clock: Arc<dyn Clock>,
    config: Config,
    scheduler_started: AtomicBool,
}

impl Handler {
    fn new(
        registry: CommandRegistry,
        context: Arc<CommandContext>,
        task_service: Arc<TaskService>,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Self {
        Handler {
            registry,
            context,
            task_service,
            clock,
            config,
            scheduler_started: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        let registration = match self.config.guild_id {
            Some(id) => register_guild_commands(&ctx, GuildId(id)).await,
            None => register_global_commands(&ctx).await,
        };
        if let Err(e) = registration {
            error!("Failed to register slash commands: {e}");
        }

        // Ready fires again on reconnect; only the first one starts the
        // reminder triggers.
        if self
            .scheduler_started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let notifier = Arc::new(DiscordNotifier::new(
                Arc::clone(&ctx.http),
                Arc::clone(&self.clock),
            ));
            let scheduler = Arc::new(ReminderScheduler::new(
                Arc::clone(&self.task_service),
                notifier,
                Arc::clone(&self.clock),
                self.config.reminder_channel_id.clone(),
                Cadence::Daily {
                    hour: self.config.daily_reminder_hour,
                    minute: self.config.daily_reminder_minute,
                },
                Cadence::Weekly {
                    weekday: self.config.weekly_reminder_weekday,
                    hour: self.config.daily_reminder_hour,
                    minute: self.config.daily_reminder_minute,
                },
            ));
            scheduler.start();
            info!("Reminder scheduler started");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            let name = command.data.name.clone();
            let Some(handler) = self.registry.get(&name) else {
                return;
            };
            if let Err(e) = handler
                .handle(Arc::clone(&self.context), &ctx, &command)
                .await
            {
                error!("Error handling /{name}: {e}");
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Due Bot...");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let database = Database::new(&config.database_path).await?;
    let repository = Arc::new(SqliteTaskRepository::new(database, Arc::clone(&clock)));
    let task_service = Arc::new(TaskService::new(repository, Arc::clone(&clock)));

    let context = Arc::new(CommandContext::new(
        Arc::clone(&task_service),
        Arc::clone(&clock),
        config.class_updates_channel_id.clone(),
    ));

    let mut registry = CommandRegistry::new();
    for handler in create_all_handlers() {
        registry.register(handler);
    }

    let handler = Handler::new(
        registry,
        context,
        task_service,
        clock,
        config.clone(),
    );

    // Slash commands only; no message content access needed
    let intents = GatewayIntents::GUILDS;
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await?;

    info!("Connecting to Discord...");
    client.start().await?;

    Ok(())
}
