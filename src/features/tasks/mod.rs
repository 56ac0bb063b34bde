//! # Feature: Tasks
//!
//! Deadline-tracked task domain: immutable entity, repository contract with an
//! in-memory reference implementation, and the validated service that is the
//! only mutation/query entry point.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release

pub mod entity;
pub mod repository;
pub mod service;

pub use entity::{NewTask, Task};
pub use repository::{due_window, InMemoryTaskRepository, TaskRepository};
pub use service::{CreateTaskRequest, TaskService};
