//! # Features Layer
//!
//! Feature modules for the assignment bot.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Tasks and reminders features

pub mod reminders;
pub mod tasks;

pub use reminders::{Cadence, DiscordNotifier, Notifier, ReminderScheduler};
pub use tasks::{CreateTaskRequest, InMemoryTaskRepository, Task, TaskRepository, TaskService};
