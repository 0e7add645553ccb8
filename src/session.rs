//! This module holds the state of a client session
//!
//! A [`Session`] owns the current snapshot of tasks, the notification engine and the feedback channels.
//! It forwards changes to a [`TaskSource`] and reloads the snapshot after each of them.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};

use crate::error::{Error, Result};
use crate::feedback::FeedbackSenders;
use crate::filter::{filter_tasks, SearchFilter};
use crate::notification::{NotificationEngine, NotificationEvent, ReloadPolicy};
use crate::statistics::{compute_statistics, StatisticsSnapshot};
use crate::store::TaskStore;
use crate::task::{NewTask, Task, TaskId, TaskUpdate};
use crate::traits::TaskSource;

/// A session that can be shared between tasks (e.g. a UI and a notification timer).
///
/// The mutex serializes refreshes and notification ticks.
pub type SharedSession<S> = Arc<tokio::sync::Mutex<Session<S>>>;

/// Tunables of a [`Session`]
#[derive(Clone, Debug)]
pub struct SessionSettings {
    /// How often [`Session::run_notification_timer`] scans the tasks. Must not be zero
    pub tick_period: Duration,
    /// How close to a start or end time a task is notified
    pub window: chrono::Duration,
    pub reload_policy: ReloadPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_period: crate::config::DEFAULT_TICK_PERIOD,
            window: crate::config::notification_window(),
            reload_policy: ReloadPolicy::default(),
        }
    }
}

/// The state of a client: a task source, and what has been fetched from it.
pub struct Session<S>
where
    S: TaskSource,
{
    source: S,
    store: TaskStore,
    engine: NotificationEngine,
    feedback: FeedbackSenders,
    settings: SessionSettings,
}

impl<S> Session<S>
where
    S: TaskSource,
{
    /// Create a session. Nothing is fetched until [`Self::refresh`] is called
    pub fn new(source: S, feedback: FeedbackSenders) -> Self {
        Self::with_settings(source, feedback, SessionSettings::default())
    }

    pub fn with_settings(source: S, feedback: FeedbackSenders, settings: SessionSettings) -> Self {
        let engine = NotificationEngine::with_settings(settings.window, settings.reload_policy);
        Self {
            source,
            store: TaskStore::new(),
            engine,
            feedback,
            settings,
        }
    }

    /// Wrap this session so that it can be used by [`Self::run_notification_timer`]
    pub fn into_shared(self) -> SharedSession<S> {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    pub fn source(&self) -> &S                      { &self.source   }
    /// Apart from tests, there are very few reasons to access the source directly: changes made this way are not reflected until the next refresh
    pub fn source_mut(&mut self) -> &mut S          { &mut self.source }
    pub fn store(&self) -> &TaskStore               { &self.store    }
    pub fn tasks(&self) -> &[Task]                  { self.store.tasks() }
    pub fn engine(&self) -> &NotificationEngine     { &self.engine   }
    pub fn settings(&self) -> &SessionSettings      { &self.settings }

    /// Fetch every task from the source, and replace the current snapshot with them.
    ///
    /// Statistics are recomputed and published. In case the fetch fails, the previous snapshot is kept.
    pub async fn refresh(&mut self) -> Result<StatisticsSnapshot> {
        self.refresh_at(&Local::now()).await
    }

    /// Same as [`Self::refresh`], with statistics computed as of `now`
    pub async fn refresh_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<StatisticsSnapshot> {
        let tasks = match self.source.get_tasks().await {
            Err(err) => {
                if err.is_auth_failure() {
                    log::warn!("Unable to load tasks, the user must sign in again: {}", err);
                } else {
                    log::warn!("Failed to load tasks: {}", err);
                }
                return Err(err);
            },
            Ok(tasks) => tasks,
        };

        self.store.replace(tasks);
        self.engine.on_reload(&self.store);
        Ok(self.update_statistics(now))
    }

    /// Compute the statistics of the current snapshot, and publish them
    pub fn update_statistics<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> StatisticsSnapshot {
        let snapshot = compute_statistics(&self.store, now);
        self.feedback.statistics_updated(snapshot);
        snapshot
    }

    /// Run the notification engine over the current snapshot, and publish what it found
    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Vec<NotificationEvent> {
        let events = self.engine.check_notifications(&self.store, now);
        for event in &events {
            self.feedback.notify(event.clone());
        }
        events
    }

    /// The tasks of the current snapshot that match a filter
    pub fn filter<Tz: TimeZone>(&self, filter: &SearchFilter, now: &DateTime<Tz>) -> Vec<&Task> {
        filter_tasks(&self.store, filter, now)
    }

    /// Look a task up on the source. A missing task gives an empty result, not an error
    pub async fn search(&self, id: &TaskId) -> Result<Vec<Task>> {
        let found = self.source.get_task(id).await?;
        if found.is_none() {
            log::info!("No task found with ID {}", id);
        }
        Ok(found.into_iter().collect())
    }

    /// Create a task, then reload the snapshot
    pub async fn add_task(&mut self, task: NewTask) -> Result<Task> {
        let created = self.source.add_task(task).await?;
        self.refresh_after_change().await;
        Ok(created)
    }

    /// Edit a task, then reload the snapshot
    pub async fn update_task(&mut self, id: &TaskId, update: TaskUpdate) -> Result<Option<Task>> {
        let updated = self.source.update_task(id, update).await?;
        if updated.is_some() {
            self.refresh_after_change().await;
        }
        Ok(updated)
    }

    /// Delete a task, then reload the snapshot
    pub async fn delete_task(&mut self, id: &TaskId) -> Result<bool> {
        let deleted = self.source.delete_task(id).await?;
        if deleted {
            self.refresh_after_change().await;
        }
        Ok(deleted)
    }

    /// Mark a task as done (or undone), then reload the snapshot
    pub async fn toggle_task(&mut self, id: &TaskId) -> Result<Option<Task>> {
        let toggled = self.source.toggle_task(id).await?;
        if toggled.is_some() {
            self.refresh_after_change().await;
        }
        Ok(toggled)
    }

    async fn refresh_after_change(&mut self) {
        if let Err(err) = self.refresh().await {
            log::warn!("The change succeeded, but the tasks could not be reloaded: {}", err);
        }
    }

    /// Scan the tasks of a shared session every [`SessionSettings::tick_period`], for as long as someone listens to its notifications.
    ///
    /// A period longer than the notification window may miss some start or end times. A zero period is refused.
    pub async fn run_notification_timer(session: SharedSession<S>) -> Result<()> {
        Self::run_notification_timer_with_clock(session, Local::now).await
    }

    /// Same as [`Self::run_notification_timer`], with a custom clock
    pub async fn run_notification_timer_with_clock<Tz, F>(session: SharedSession<S>, clock: F) -> Result<()>
    where
        Tz: TimeZone,
        F: Fn() -> DateTime<Tz>,
    {
        let period = {
            let session = session.lock().await;
            let period = session.settings.tick_period;
            if period == Duration::from_secs(0) {
                log::error!("Refusing to start a notification timer with a zero period");
                return Err(Error::InvalidInput("the notification tick period must not be zero".to_string()));
            }

            let window = session.engine.window();
            let too_long = chrono::Duration::from_std(period)
                .map(|p| p > window)
                .unwrap_or(true);
            if too_long {
                log::warn!("Notification timer period ({:?}) is longer than the notification window ({}s). Some notifications may be missed",
                    period, window.num_seconds());
            }
            period
        };

        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let mut session = session.lock().await;
            session.tick(&clock());
            if session.feedback.notification_listener_gone() {
                log::info!("Nobody listens to notifications anymore. Stopping the notification timer");
                return Ok(());
            }
        }
    }
}
