//! Per-command handler implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: TaskCommandHandler and ClassEndedHandler

pub mod class_ended;
pub mod tasks;

use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(tasks::TaskCommandHandler),
        Arc::new(class_ended::ClassEndedHandler),
    ]
}
