//! # Core Module
//!
//! Configuration, error taxonomy, and the injectable clock shared by every
//! layer of the bot.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with config, errors, and clock modules

pub mod clock;
pub mod config;
pub mod errors;

// Re-export commonly used items
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use errors::{ErrorCode, TaskError};
