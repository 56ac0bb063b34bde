//! # Database Module
//!
//! Sqlite-backed persistence. [`Database`] owns the connection and schema;
//! [`SqliteTaskRepository`] implements the task repository contract on top of
//! it. Dates are stored as unix milliseconds so `ORDER BY due_date` is
//! chronological.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Task repository implementation with ownership-checked delete
//! - 1.0.0: Initial connection handling and schema bootstrap

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use sqlite::{Connection, State};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::{Clock, TaskError};
use crate::features::tasks::{due_window, NewTask, Task, TaskRepository};

/// Shared handle to the sqlite connection
///
/// The sqlite connection is not Sync, so all access goes through one async
/// mutex; each repository call holds the lock for its full check-then-act.
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists
    pub async fn new(path: &str) -> Result<Self> {
        let connection = sqlite::open(path)?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                subject TEXT NOT NULL,
                description TEXT,
                due_date INTEGER NOT NULL,
                registered_by TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks (due_date);",
        )?;
        info!("Database ready at {path}");
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

fn storage_error(e: sqlite::Error) -> TaskError {
    TaskError::database(e.to_string())
}

fn millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

fn from_millis(ms: i64, column: &str) -> Result<DateTime<Utc>, TaskError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| TaskError::database(format!("Corrupt {column} timestamp: {ms}")))
}

fn read_task(stmt: &sqlite::Statement<'_>) -> Result<Task, TaskError> {
    Ok(Task {
        id: stmt.read::<String, _>("id").map_err(storage_error)?,
        name: stmt.read::<String, _>("name").map_err(storage_error)?,
        subject: stmt.read::<String, _>("subject").map_err(storage_error)?,
        description: stmt
            .read::<Option<String>, _>("description")
            .map_err(storage_error)?,
        due_date: from_millis(
            stmt.read::<i64, _>("due_date").map_err(storage_error)?,
            "due_date",
        )?,
        registered_by: stmt
            .read::<String, _>("registered_by")
            .map_err(storage_error)?,
        created_at: from_millis(
            stmt.read::<i64, _>("created_at").map_err(storage_error)?,
            "created_at",
        )?,
    })
}

/// Task repository backed by [`Database`]
pub struct SqliteTaskRepository {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl SqliteTaskRepository {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    async fn query_tasks(
        &self,
        sql: &str,
        binds: &[(usize, sqlite::Value)],
    ) -> Result<Vec<Task>, TaskError> {
        let connection = self.db.connection.lock().await;
        let mut stmt = connection.prepare(sql).map_err(storage_error)?;
        for (index, value) in binds {
            stmt.bind((*index, value)).map_err(storage_error)?;
        }

        let mut tasks = Vec::new();
        while let State::Row = stmt.next().map_err(storage_error)? {
            tasks.push(read_task(&stmt)?);
        }
        Ok(tasks)
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
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

        let connection = self.db.connection.lock().await;
        let mut stmt = connection
            .prepare(
                "INSERT INTO tasks (id, name, subject, description, due_date, registered_by, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .map_err(storage_error)?;
        stmt.bind((1, task.id.as_str())).map_err(storage_error)?;
        stmt.bind((2, task.name.as_str())).map_err(storage_error)?;
        stmt.bind((3, task.subject.as_str()))
            .map_err(storage_error)?;
        stmt.bind((4, task.description.as_deref()))
            .map_err(storage_error)?;
        stmt.bind((5, millis(task.due_date)))
            .map_err(storage_error)?;
        stmt.bind((6, task.registered_by.as_str()))
            .map_err(storage_error)?;
        stmt.bind((7, millis(task.created_at)))
            .map_err(storage_error)?;
        stmt.next().map_err(storage_error)?;

        Ok(task)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>, TaskError> {
        let connection = self.db.connection.lock().await;
        let mut stmt = connection
            .prepare("SELECT * FROM tasks WHERE id = ?")
            .map_err(storage_error)?;
        stmt.bind((1, id)).map_err(storage_error)?;

        match stmt.next().map_err(storage_error)? {
            State::Row => Ok(Some(read_task(&stmt)?)),
            State::Done => Ok(None),
        }
    }

    async fn find_all_active(&self) -> Result<Vec<Task>, TaskError> {
        self.query_tasks("SELECT * FROM tasks ORDER BY due_date ASC", &[])
            .await
    }

    async fn find_by_name_keyword(&self, keyword: &str) -> Result<Vec<Task>, TaskError> {
        // instr over lowered text: case-insensitive substring without LIKE
        // wildcard interpretation of user input
        self.query_tasks(
            "SELECT * FROM tasks WHERE instr(lower(name), lower(?)) > 0 ORDER BY due_date ASC",
            &[(1, keyword.into())],
        )
        .await
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Vec<Task>, TaskError> {
        self.query_tasks(
            "SELECT * FROM tasks WHERE instr(lower(subject), lower(?)) > 0 ORDER BY due_date ASC",
            &[(1, subject.into())],
        )
        .await
    }

    async fn find_due_tasks(&self, days: i64) -> Result<Vec<Task>, TaskError> {
        let (start, end) = due_window(self.clock.now(), days);
        self.query_tasks(
            "SELECT * FROM tasks WHERE due_date >= ? AND due_date <= ? ORDER BY due_date ASC",
            &[(1, millis(start).into()), (2, millis(end).into())],
        )
        .await
    }

    async fn find_overdue_tasks(&self) -> Result<Vec<Task>, TaskError> {
        self.query_tasks(
            "SELECT * FROM tasks WHERE due_date < ? ORDER BY due_date ASC",
            &[(1, millis(self.clock.now()).into())],
        )
        .await
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool, TaskError> {
        // Ownership re-check and removal run under the same connection lock,
        // so racing owner deletes see at most one success.
        let connection = self.db.connection.lock().await;

        let mut check = connection
            .prepare("SELECT registered_by FROM tasks WHERE id = ?")
            .map_err(storage_error)?;
        check.bind((1, id)).map_err(storage_error)?;
        match check.next().map_err(storage_error)? {
            State::Done => return Ok(false),
            State::Row => {
                let owner = check
                    .read::<String, _>("registered_by")
                    .map_err(storage_error)?;
                if owner != user_id {
                    return Ok(false);
                }
            }
        }

        let mut delete = connection
            .prepare("DELETE FROM tasks WHERE id = ?")
            .map_err(storage_error)?;
        delete.bind((1, id)).map_err(storage_error)?;
        delete.next().map_err(storage_error)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap()
    }

    async fn repo() -> SqliteTaskRepository {
        let db = Database::new(":memory:").await.unwrap();
        SqliteTaskRepository::new(db, Arc::new(FixedClock::new(fixed_now())))
    }

    fn new_task(name: &str, due: DateTime<Utc>, owner: &str) -> NewTask {
        NewTask {
            name: name.to_string(),
            subject: "History".to_string(),
            description: Some("read chapter 4".to_string()),
            due_date: due,
            registered_by: owner.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_round_trip() {
        let repo = repo().await;
        let created = repo
            .create(new_task("Essay", fixed_now() + Duration::days(2), "u1"))
            .await
            .unwrap();

        assert_eq!(created.created_at, fixed_now());
        let found = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_find_by_id_absent_is_none() {
        let repo = repo().await;
        assert_eq!(repo.find_by_id("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ordering_and_keyword_search() {
        let repo = repo().await;
        repo.create(new_task("Zeta essay", fixed_now() + Duration::days(5), "u1"))
            .await
            .unwrap();
        repo.create(new_task("Alpha ESSAY", fixed_now() + Duration::days(1), "u1"))
            .await
            .unwrap();
        repo.create(new_task("Quiz prep", fixed_now() + Duration::days(3), "u1"))
            .await
            .unwrap();

        let all: Vec<String> = repo
            .find_all_active()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(all, vec!["Alpha ESSAY", "Quiz prep", "Zeta essay"]);

        let hits: Vec<String> = repo
            .find_by_name_keyword("essay")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(hits, vec!["Alpha ESSAY", "Zeta essay"]);

        let subject_hits = repo.find_by_subject("hist").await.unwrap();
        assert_eq!(subject_hits.len(), 3);
    }

    #[tokio::test]
    async fn test_due_and_overdue_windows() {
        let repo = repo().await;
        repo.create(new_task(
            "Tonight",
            Utc.with_ymd_and_hms(2025, 6, 20, 23, 59, 0).unwrap(),
            "u1",
        ))
        .await
        .unwrap();
        repo.create(new_task(
            "Tomorrow",
            Utc.with_ymd_and_hms(2025, 6, 21, 0, 1, 0).unwrap(),
            "u1",
        ))
        .await
        .unwrap();
        repo.create(new_task("Past", fixed_now() - Duration::days(2), "u1"))
            .await
            .unwrap();

        let today = repo.find_due_tasks(0).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].name, "Tonight");

        let overdue = repo.find_overdue_tasks().await.unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].name, "Past");
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let repo = repo().await;
        let task = repo
            .create(new_task("Essay", fixed_now() + Duration::days(1), "owner"))
            .await
            .unwrap();

        assert!(!repo.delete(&task.id, "intruder").await.unwrap());
        assert!(repo.find_by_id(&task.id).await.unwrap().is_some());

        assert!(repo.delete(&task.id, "owner").await.unwrap());
        assert!(!repo.delete(&task.id, "owner").await.unwrap());
        assert!(repo.find_by_id(&task.id).await.unwrap().is_none());
    }
}
