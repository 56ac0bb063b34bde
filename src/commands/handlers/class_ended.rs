//! Class-ended command handler
//!
//! Handles: class_ended
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation posting the add-task prompt

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::ChannelId;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::features::reminders::notifier::build_class_ended_embed;

/// Handler for the end-of-class prompt
pub struct ClassEndedHandler;

#[async_trait]
impl SlashCommandHandler for ClassEndedHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["class_ended"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let destination = &ctx.class_updates_channel_id;
        let content = match destination.trim().parse::<u64>() {
            Ok(id) => {
                let channel = ChannelId(id);
                match channel
                    .send_message(&serenity_ctx.http, |m| {
                        m.set_embed(build_class_ended_embed(ctx.clock.now()))
                    })
                    .await
                {
                    Ok(_) => {
                        info!("Class-ended prompt posted to channel {channel}");
                        "🎓 Posted the end-of-class prompt."
                    }
                    Err(e) => {
                        error!("Failed to post class-ended prompt to channel {channel}: {e}");
                        "❌ Could not post to the class updates channel."
                    }
                }
            }
            Err(_) => {
                error!("Invalid class updates channel id: {destination}");
                "❌ The class updates channel is misconfigured."
            }
        };

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|msg| msg.content(content).ephemeral(true))
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_ended_handler_commands() {
        let handler = ClassEndedHandler;
        assert_eq!(handler.command_names(), &["class_ended"]);
    }
}
