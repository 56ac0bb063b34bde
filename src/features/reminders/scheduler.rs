//! Reminder scheduler
//!
//! Two independently-timed triggers (daily digest, weekly digest), each
//! strictly serialized against itself by an in-flight guard: a fire still
//! running when its next instant arrives is skipped for that instant. Errors
//! inside a fire are logged and swallowed; the next cadence is the only retry.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Urgency-bucket digests over TaskService with per-trigger guards
//! - 1.0.0: Initial one-shot reminder delivery loop

use log::{debug, error, info, warn};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::core::{Clock, TaskError};
use crate::features::tasks::{Task, TaskService};

use super::cadence::Cadence;
use super::notifier::Notifier;

/// Drives the daily and weekly reminder triggers
pub struct ReminderScheduler {
    service: Arc<TaskService>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    destination: String,
    daily_cadence: Cadence,
    weekly_cadence: Cadence,
    daily_in_flight: AtomicBool,
    weekly_in_flight: AtomicBool,
}

impl ReminderScheduler {
    pub fn new(
        service: Arc<TaskService>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        destination: String,
        daily_cadence: Cadence,
        weekly_cadence: Cadence,
    ) -> Self {
        Self {
            service,
            notifier,
            clock,
            destination,
            daily_cadence,
            weekly_cadence,
            daily_in_flight: AtomicBool::new(false),
            weekly_in_flight: AtomicBool::new(false),
        }
    }

    /// Spawn one timer loop per trigger
    ///
    /// The two triggers run independently of each other; only same-trigger
    /// fires are serialized.
    pub fn start(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        info!(
            "Reminder triggers scheduled: daily {:?}, weekly {:?}",
            self.daily_cadence, self.weekly_cadence
        );

        let daily = Arc::clone(&self);
        let daily_loop = tokio::spawn(async move {
            loop {
                daily.sleep_until_next(daily.daily_cadence).await;
                daily.fire_daily().await;
            }
        });

        let weekly = Arc::clone(&self);
        let weekly_loop = tokio::spawn(async move {
            loop {
                weekly.sleep_until_next(weekly.weekly_cadence).await;
                weekly.fire_weekly().await;
            }
        });

        vec![daily_loop, weekly_loop]
    }

    async fn sleep_until_next(&self, cadence: Cadence) {
        let now = self.clock.now();
        let next = cadence.next_fire_after(now);
        let wait = (next - now).to_std().unwrap_or_default();
        debug!("Next fire for {cadence:?} at {next}");
        tokio::time::sleep(wait).await;
    }

    /// Run the daily digest, guarded and fire-and-log
    pub async fn fire_daily(&self) {
        self.run_guarded("daily reminder", &self.daily_in_flight, self.daily_digest())
            .await;
    }

    /// Run the weekly digest, guarded and fire-and-log
    pub async fn fire_weekly(&self) {
        self.run_guarded(
            "weekly reminder",
            &self.weekly_in_flight,
            self.weekly_digest(),
        )
        .await;
    }

    async fn run_guarded(
        &self,
        name: &str,
        in_flight: &AtomicBool,
        fire: impl Future<Output = Result<(), TaskError>>,
    ) {
        if in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Skipping {name} fire: previous fire still in flight");
            return;
        }

        if let Err(e) = fire.await {
            error!("Error in {name} fire: {e}");
        }
        in_flight.store(false, Ordering::SeqCst);
    }

    /// Overdue, due-today, and due-tomorrow buckets, in that order
    async fn daily_digest(&self) -> Result<(), TaskError> {
        let overdue = self.service.get_overdue_tasks().await?;
        let today = self.service.get_tasks_due_in_days(0).await?;
        let tomorrow = self.service.get_tasks_due_in_days(1).await?;

        // The one-day window subsumes today's; keep each task's first
        // occurrence so the bucket order stays [overdue, today, tomorrow].
        let mut batch: Vec<Task> = Vec::new();
        for task in overdue.into_iter().chain(today).chain(tomorrow) {
            if !batch.iter().any(|t| t.id == task.id) {
                batch.push(task);
            }
        }

        if batch.is_empty() {
            debug!("Daily reminder: no urgent tasks, skipping notification");
            return Ok(());
        }

        info!("Daily reminder: notifying {} task(s)", batch.len());
        self.notifier
            .send_reminder_batch(&self.destination, &batch)
            .await;
        Ok(())
    }

    /// Tasks due within the coming week
    async fn weekly_digest(&self) -> Result<(), TaskError> {
        let weekly = self.service.get_tasks_due_in_days(7).await?;

        if weekly.is_empty() {
            debug!("Weekly reminder: nothing due this week, skipping notification");
            return Ok(());
        }

        info!("Weekly reminder: notifying {} task(s)", weekly.len());
        self.notifier
            .send_reminder_batch(&self.destination, &weekly)
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::features::tasks::{InMemoryTaskRepository, NewTask, TaskRepository};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};
    use std::sync::Mutex;

    struct RecordingNotifier {
        calls: Mutex<Vec<(String, Vec<Task>)>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Vec<Task>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_reminder_batch(&self, destination: &str, tasks: &[Task]) {
            self.calls
                .lock()
                .unwrap()
                .push((destination.to_string(), tasks.to_vec()));
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl TaskRepository for FailingRepository {
        async fn create(&self, _data: NewTask) -> Result<Task, TaskError> {
            Err(TaskError::database("storage offline"))
        }
        async fn find_by_id(&self, _id: &str) -> Result<Option<Task>, TaskError> {
            Err(TaskError::database("storage offline"))
        }
        async fn find_all_active(&self) -> Result<Vec<Task>, TaskError> {
            Err(TaskError::database("storage offline"))
        }
        async fn find_by_name_keyword(&self, _keyword: &str) -> Result<Vec<Task>, TaskError> {
            Err(TaskError::database("storage offline"))
        }
        async fn find_by_subject(&self, _subject: &str) -> Result<Vec<Task>, TaskError> {
            Err(TaskError::database("storage offline"))
        }
        async fn find_due_tasks(&self, _days: i64) -> Result<Vec<Task>, TaskError> {
            Err(TaskError::database("storage offline"))
        }
        async fn find_overdue_tasks(&self) -> Result<Vec<Task>, TaskError> {
            Err(TaskError::database("storage offline"))
        }
        async fn delete(&self, _id: &str, _user_id: &str) -> Result<bool, TaskError> {
            Err(TaskError::database("storage offline"))
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap()
    }

    fn cadences() -> (Cadence, Cadence) {
        (
            Cadence::Daily { hour: 9, minute: 0 },
            Cadence::Weekly {
                weekday: Weekday::Mon,
                hour: 9,
                minute: 0,
            },
        )
    }

    fn scheduler_with(
        repo: Arc<dyn TaskRepository>,
        notifier: Arc<RecordingNotifier>,
    ) -> ReminderScheduler {
        let clock = Arc::new(FixedClock::new(fixed_now()));
        let service = Arc::new(TaskService::new(repo, clock.clone()));
        let (daily, weekly) = cadences();
        ReminderScheduler::new(
            service,
            notifier,
            clock,
            "123456".to_string(),
            daily,
            weekly,
        )
    }

    async fn seeded_scheduler(
        due_dates: &[(&str, DateTime<Utc>)],
        notifier: Arc<RecordingNotifier>,
    ) -> ReminderScheduler {
        let clock = Arc::new(FixedClock::new(fixed_now()));
        let repo = Arc::new(InMemoryTaskRepository::new(clock.clone()));
        let service = Arc::new(TaskService::new(repo.clone(), clock.clone()));
        for (name, due) in due_dates {
            // Seed straight through the repository so past due dates are allowed
            repo.create(NewTask {
                name: name.to_string(),
                subject: "Math".to_string(),
                description: None,
                due_date: *due,
                registered_by: "u1".to_string(),
            })
            .await
            .unwrap();
        }
        let (daily, weekly) = cadences();
        ReminderScheduler::new(
            service,
            notifier,
            clock,
            "123456".to_string(),
            daily,
            weekly,
        )
    }

    #[tokio::test]
    async fn test_daily_fire_merges_buckets_in_order() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = seeded_scheduler(
            &[
                ("Today", Utc.with_ymd_and_hms(2025, 6, 20, 23, 0, 0).unwrap()),
                ("Overdue", fixed_now() - Duration::days(3)),
            ],
            notifier.clone(),
        )
        .await;

        scheduler.fire_daily().await;

        let calls = notifier.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "123456");
        let names: Vec<&str> = calls[0].1.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Overdue", "Today"]);
    }

    #[tokio::test]
    async fn test_daily_fire_includes_tomorrow_without_duplicates() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = seeded_scheduler(
            &[
                ("Today", Utc.with_ymd_and_hms(2025, 6, 20, 23, 0, 0).unwrap()),
                ("Tomorrow", Utc.with_ymd_and_hms(2025, 6, 21, 9, 0, 0).unwrap()),
            ],
            notifier.clone(),
        )
        .await;

        scheduler.fire_daily().await;

        let calls = notifier.calls();
        assert_eq!(calls.len(), 1);
        let names: Vec<&str> = calls[0].1.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Today", "Tomorrow"]);
    }

    #[tokio::test]
    async fn test_daily_fire_with_no_urgent_tasks_skips_notifier() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = seeded_scheduler(
            &[("Far off", fixed_now() + Duration::days(30))],
            notifier.clone(),
        )
        .await;

        scheduler.fire_daily().await;
        assert!(notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_weekly_fire_excludes_eight_day_task() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = seeded_scheduler(
            &[("Eight days", fixed_now() + Duration::days(8))],
            notifier.clone(),
        )
        .await;

        scheduler.fire_weekly().await;
        assert!(notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_weekly_fire_includes_week_window() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = seeded_scheduler(
            &[("Seven days", fixed_now() + Duration::days(7))],
            notifier.clone(),
        )
        .await;

        scheduler.fire_weekly().await;

        let calls = notifier.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.len(), 1);
    }

    #[tokio::test]
    async fn test_fire_swallows_repository_errors() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = scheduler_with(Arc::new(FailingRepository), notifier.clone());

        // Must complete cleanly and not notify
        scheduler.fire_daily().await;
        scheduler.fire_weekly().await;
        assert!(notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_fire_is_skipped_not_queued() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = seeded_scheduler(
            &[("Overdue", fixed_now() - Duration::days(1))],
            notifier.clone(),
        )
        .await;

        scheduler.daily_in_flight.store(true, Ordering::SeqCst);
        scheduler.fire_daily().await;
        assert!(notifier.calls().is_empty());

        scheduler.daily_in_flight.store(false, Ordering::SeqCst);
        scheduler.fire_daily().await;
        assert_eq!(notifier.calls().len(), 1);
    }
}
