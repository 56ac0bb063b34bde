//! # Command System
//!
//! Slash command (/) handling for Discord interactions: handler trait, static
//! registry, shared context, and command definitions.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial modular command structure

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use handlers::create_all_handlers;
pub use registry::CommandRegistry;
pub use slash::{
    create_slash_commands, get_string_option, register_global_commands, register_guild_commands,
};
