//! # Feature: Reminders
//!
//! Scheduled deadline reminders: daily and weekly triggers that bucket tasks
//! by urgency and deliver one notification batch per fire.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Urgency-bucket digests with explicit cadences and notifier contract
//! - 1.0.0: Initial release

pub mod cadence;
pub mod notifier;
pub mod scheduler;

pub use cadence::Cadence;
pub use notifier::{DiscordNotifier, Notifier};
pub use scheduler::ReminderScheduler;
