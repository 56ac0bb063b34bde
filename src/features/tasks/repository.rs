//! Task repository contract and in-memory reference implementation
//!
//! The repository owns durable storage only; validation and authorization live
//! in the service. The delete ownership re-check here is deliberate defense in
//! depth on top of the service's check.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Extract shared due-window calculation for repository implementations
//! - 1.0.0: Initial contract plus DashMap-backed in-memory implementation

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::{Clock, TaskError};

use super::entity::{NewTask, Task};

/// Persistence boundary for tasks
///
/// Implementations must return query results ascending by due date and must
/// only error on genuine storage failure; expected absence is `None`/`false`.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persist a new task, assigning a fresh id and creation timestamp
    async fn create(&self, data: NewTask) -> Result<Task, TaskError>;

    /// Look up a task by id; absence is `None`, not an error
    async fn find_by_id(&self, id: &str) -> Result<Option<Task>, TaskError>;

    /// All tasks, ascending by due date
    async fn find_all_active(&self) -> Result<Vec<Task>, TaskError>;

    /// Case-insensitive substring match on the task name
    async fn find_by_name_keyword(&self, keyword: &str) -> Result<Vec<Task>, TaskError>;

    /// Case-insensitive substring match on the subject
    async fn find_by_subject(&self, subject: &str) -> Result<Vec<Task>, TaskError>;

    /// Tasks due in `[now, end-of-day(now + days)]`, both ends inclusive
    async fn find_due_tasks(&self, days: i64) -> Result<Vec<Task>, TaskError>;

    /// Tasks whose due date is strictly before now
    async fn find_overdue_tasks(&self) -> Result<Vec<Task>, TaskError>;

    /// Delete a task if it exists and is owned by `user_id`
    ///
    /// Returns `false` for not-found or not-owned. The ownership re-check is
    /// performed here regardless of any prior check by the caller.
    async fn delete(&self, id: &str, user_id: &str) -> Result<bool, TaskError>;
}

/// Inclusive due-window bounds shared by repository implementations
///
/// The window is anchored at the current instant, not the start of today,
/// and closes at 23:59:59.999 on the target calendar day.
pub fn due_window(now: DateTime<Utc>, days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = (now + Duration::days(days))
        .date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is a valid time")
        .and_utc();
    (now, end)
}

/// In-memory repository backed by a DashMap
///
/// Reference implementation used by tests and as the substitution point the
/// service is built against.
pub struct InMemoryTaskRepository {
    tasks: DashMap<String, Task>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTaskRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks: DashMap::new(),
            clock,
        }
    }

    fn sorted(&self, mut tasks: Vec<Task>) -> Vec<Task> {
        tasks.sort_by_key(|t| t.due_date);
        tasks
    }

    fn collect_where(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        let matched = self
            .tasks
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        self.sorted(matched)
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, data: NewTask) -> Result<Task, TaskError> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            subject: data.subject,
            description: data.description,
            due_date: data.due_date,
            registered_by: data.registered_by,
            created_at: self.clock.now(),
        };
        self.tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>, TaskError> {
        Ok(self.tasks.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_all_active(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self.collect_where(|_| true))
    }

    async fn find_by_name_keyword(&self, keyword: &str) -> Result<Vec<Task>, TaskError> {
        let keyword = keyword.to_lowercase();
        Ok(self.collect_where(|t| t.name.to_lowercase().contains(&keyword)))
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Vec<Task>, TaskError> {
        let subject = subject.to_lowercase();
        Ok(self.collect_where(|t| t.subject.to_lowercase().contains(&subject)))
    }

    async fn find_due_tasks(&self, days: i64) -> Result<Vec<Task>, TaskError> {
        let (start, end) = due_window(self.clock.now(), days);
        Ok(self.collect_where(|t| t.due_date >= start && t.due_date <= end))
    }

    async fn find_overdue_tasks(&self) -> Result<Vec<Task>, TaskError> {
        let now = self.clock.now();
        Ok(self.collect_where(|t| t.due_date < now))
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool, TaskError> {
        // remove_if makes the ownership check and removal one atomic step,
        // so racing owner deletes yield exactly one `true`.
        Ok(self
            .tasks
            .remove_if(id, |_, task| task.registered_by == user_id)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap()
    }

    fn repo() -> InMemoryTaskRepository {
        InMemoryTaskRepository::new(Arc::new(FixedClock::new(fixed_now())))
    }

    fn new_task(name: &str, subject: &str, due: DateTime<Utc>, owner: &str) -> NewTask {
        NewTask {
            name: name.to_string(),
            subject: subject.to_string(),
            description: None,
            due_date: due,
            registered_by: owner.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_created_at() {
        let repo = repo();
        let task = repo
            .create(new_task("Report", "Physics", fixed_now() + Duration::days(2), "u1"))
            .await
            .unwrap();

        assert!(!task.id.is_empty());
        assert_eq!(task.created_at, fixed_now());

        let second = repo
            .create(new_task("Quiz", "Physics", fixed_now() + Duration::days(3), "u1"))
            .await
            .unwrap();
        assert_ne!(task.id, second.id);
    }

    #[tokio::test]
    async fn test_find_by_id_round_trip() {
        let repo = repo();
        let created = repo
            .create(new_task("Report", "Physics", fixed_now() + Duration::days(2), "u1"))
            .await
            .unwrap();

        let found = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(repo.find_by_id("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_all_active_sorted_by_due_date() {
        let repo = repo();
        repo.create(new_task("Late", "A", fixed_now() + Duration::days(5), "u1"))
            .await
            .unwrap();
        repo.create(new_task("Soon", "B", fixed_now() + Duration::days(1), "u1"))
            .await
            .unwrap();
        repo.create(new_task("Middle", "C", fixed_now() + Duration::days(3), "u1"))
            .await
            .unwrap();

        let names: Vec<String> = repo
            .find_all_active()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Soon", "Middle", "Late"]);
    }

    #[tokio::test]
    async fn test_keyword_search_is_case_insensitive_substring() {
        let repo = repo();
        repo.create(new_task("Final Essay", "English", fixed_now() + Duration::days(2), "u1"))
            .await
            .unwrap();
        repo.create(new_task("Lab report", "Chemistry", fixed_now() + Duration::days(2), "u1"))
            .await
            .unwrap();

        let hits = repo.find_by_name_keyword("ESSAY").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Final Essay");

        let subject_hits = repo.find_by_subject("chem").await.unwrap();
        assert_eq!(subject_hits.len(), 1);
        assert_eq!(subject_hits[0].subject, "Chemistry");
    }

    #[tokio::test]
    async fn test_due_window_is_inclusive_of_end_of_day() {
        let repo = repo();
        // Due 23:59 today
        repo.create(new_task(
            "Tonight",
            "A",
            Utc.with_ymd_and_hms(2025, 6, 20, 23, 59, 0).unwrap(),
            "u1",
        ))
        .await
        .unwrap();
        // Due 00:01 tomorrow
        repo.create(new_task(
            "Past midnight",
            "B",
            Utc.with_ymd_and_hms(2025, 6, 21, 0, 1, 0).unwrap(),
            "u1",
        ))
        .await
        .unwrap();
        // Already due this morning; window starts at the current instant
        repo.create(new_task(
            "This morning",
            "C",
            Utc.with_ymd_and_hms(2025, 6, 20, 8, 0, 0).unwrap(),
            "u1",
        ))
        .await
        .unwrap();

        let today = repo.find_due_tasks(0).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].name, "Tonight");
    }

    #[tokio::test]
    async fn test_due_window_excludes_beyond_horizon() {
        let repo = repo();
        repo.create(new_task("Eight days", "A", fixed_now() + Duration::days(8), "u1"))
            .await
            .unwrap();
        repo.create(new_task("Seven days", "B", fixed_now() + Duration::days(7), "u1"))
            .await
            .unwrap();

        let week = repo.find_due_tasks(7).await.unwrap();
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].name, "Seven days");
    }

    #[tokio::test]
    async fn test_find_overdue_tasks() {
        let repo = repo();
        repo.create(new_task("Past", "A", fixed_now() - Duration::days(3), "u1"))
            .await
            .unwrap();
        repo.create(new_task("Future", "B", fixed_now() + Duration::days(1), "u1"))
            .await
            .unwrap();

        let overdue = repo.find_overdue_tasks().await.unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].name, "Past");
    }

    #[tokio::test]
    async fn test_delete_rechecks_ownership() {
        let repo = repo();
        let task = repo
            .create(new_task("Report", "A", fixed_now() + Duration::days(1), "owner"))
            .await
            .unwrap();

        // Wrong user: refused, task stays
        assert!(!repo.delete(&task.id, "intruder").await.unwrap());
        assert!(repo.find_by_id(&task.id).await.unwrap().is_some());

        // Owner: deleted; second attempt reports false
        assert!(repo.delete(&task.id, "owner").await.unwrap());
        assert!(!repo.delete(&task.id, "owner").await.unwrap());
        assert!(repo.find_by_id(&task.id).await.unwrap().is_none());
    }

    #[test]
    fn test_due_window_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 6, 20, 15, 30, 0).unwrap();
        let (start, end) = due_window(now, 1);

        assert_eq!(start, now);
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2025, 6, 21, 23, 59, 59).unwrap()
                + Duration::milliseconds(999)
        );
    }
}
