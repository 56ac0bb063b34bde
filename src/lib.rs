// Core layer - configuration, errors, clock
pub mod core;

// Features layer - task domain and reminders
pub mod features;

// Application layer - slash command handling
pub mod commands;

// Infrastructure - sqlite persistence
pub mod database;

// Re-export core items
pub use self::core::{Clock, Config, ErrorCode, SystemClock, TaskError};

// Re-export feature items
pub use features::{
    // Reminders
    Cadence, DiscordNotifier, Notifier, ReminderScheduler,
    // Tasks
    CreateTaskRequest, InMemoryTaskRepository, Task, TaskRepository, TaskService,
};

// Re-export persistence
pub use database::{Database, SqliteTaskRepository};
