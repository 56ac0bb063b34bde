//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with task service and clock

use std::sync::Arc;

use crate::core::Clock;
use crate::features::tasks::TaskService;

/// Shared context for all command handlers
///
/// Carries the task service (the only mutation/query entry point), the
/// injectable clock used for due-status rendering, and the channel the
/// class-ended prompt posts to.
#[derive(Clone)]
pub struct CommandContext {
    pub task_service: Arc<TaskService>,
    pub clock: Arc<dyn Clock>,
    pub class_updates_channel_id: String,
}

impl CommandContext {
    pub fn new(
        task_service: Arc<TaskService>,
        clock: Arc<dyn Clock>,
        class_updates_channel_id: String,
    ) -> Self {
        Self {
            task_service,
            clock,
            class_updates_channel_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context_clone() {
        // CommandContext should be Clone for sharing across handlers
        fn assert_clone<T: Clone>() {}
        assert_clone::<CommandContext>();
    }
}
