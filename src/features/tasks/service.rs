//! Task service
//!
//! Sole entry point for task mutation and query. All validation and
//! authorization happens here, none of it in the entity or repository;
//! repository soft shapes (`None`, `false`) are normalized into typed errors
//! only where the contract demands one.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation covering create/delete/search/query

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::core::{Clock, TaskError};

use super::entity::{NewTask, Task};
use super::repository::TaskRepository;

/// Caller-supplied data for a new task, pre-validation
#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    pub name: String,
    pub subject: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub registered_by: String,
}

/// Validated create/delete/query surface over a [`TaskRepository`]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Validate and persist a new task
    ///
    /// Validation order: name, subject, due date. No repository call is made
    /// when validation fails.
    pub async fn add_task(&self, request: CreateTaskRequest) -> Result<Task, TaskError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(TaskError::invalid_input("Task name is required"));
        }

        let subject = request.subject.trim();
        if subject.is_empty() {
            return Err(TaskError::invalid_input("Subject is required"));
        }

        if request.due_date <= self.clock.now() {
            return Err(TaskError::invalid_input(
                "Due date must be in the future",
            ));
        }

        let description = request
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        self.repository
            .create(NewTask {
                name: name.to_string(),
                subject: subject.to_string(),
                description,
                due_date: request.due_date,
                registered_by: request.registered_by,
            })
            .await
    }

    /// Delete a task after an ownership check
    ///
    /// Returns the repository's boolean unchanged; the repository re-checks
    /// ownership on its side as well.
    pub async fn delete_task(&self, task_id: &str, user_id: &str) -> Result<bool, TaskError> {
        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| TaskError::task_not_found("The specified task was not found"))?;

        if !task.can_be_deleted_by(user_id) {
            return Err(TaskError::permission_denied(
                "You do not have permission to delete this task",
            ));
        }

        self.repository.delete(task_id, user_id).await
    }

    /// Case-insensitive name search
    pub async fn search_tasks_by_name(&self, keyword: &str) -> Result<Vec<Task>, TaskError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(TaskError::invalid_input("Search keyword is required"));
        }
        self.repository.find_by_name_keyword(keyword).await
    }

    /// Case-insensitive subject search
    pub async fn search_tasks_by_subject(&self, subject: &str) -> Result<Vec<Task>, TaskError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(TaskError::invalid_input("Subject is required"));
        }
        self.repository.find_by_subject(subject).await
    }

    /// Look up a task by id; `None` is a valid result, not an error
    pub async fn get_task_by_id(&self, task_id: &str) -> Result<Option<Task>, TaskError> {
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Err(TaskError::invalid_input("Task ID is required"));
        }
        self.repository.find_by_id(task_id).await
    }

    /// Tasks due between now and end-of-day `days` from now, inclusive
    pub async fn get_tasks_due_in_days(&self, days: i64) -> Result<Vec<Task>, TaskError> {
        if days < 0 {
            return Err(TaskError::invalid_input("Days must be zero or greater"));
        }
        self.repository.find_due_tasks(days).await
    }

    /// Tasks whose deadline has already passed
    pub async fn get_overdue_tasks(&self) -> Result<Vec<Task>, TaskError> {
        self.repository.find_overdue_tasks().await
    }

    /// All tasks, ascending by due date
    pub async fn list_active_tasks(&self) -> Result<Vec<Task>, TaskError> {
        self.repository.find_all_active().await
    }
}
