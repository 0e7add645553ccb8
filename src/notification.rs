//! Detection of tasks that are starting or ending now

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::store::TaskStore;
use crate::task::{Task, TaskId};

/// Whether a task is starting or ending
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Starting,
    Ending,
}

/// A task has just reached its start or end time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub task_id: TaskId,
    pub description: String,
}

impl NotificationEvent {
    fn new(kind: NotificationKind, task: &Task) -> Self {
        Self {
            kind,
            task_id: task.id().clone(),
            description: task.description().to_string(),
        }
    }
}

impl Display for NotificationEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            NotificationKind::Starting => write!(f, "Task \"{}\" is starting now!", self.description),
            NotificationKind::Ending => write!(f, "Task \"{}\" is ending now!", self.description),
        }
    }
}

/// What happens to the "already notified" flags when the tasks are reloaded from the backend
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadPolicy {
    /// Forget every flag, so that a task in its window is notified again after a reload
    ResetFlags,
    /// Keep the flags of the tasks that are still present
    KeepFlags,
}

impl Default for ReloadPolicy {
    fn default() -> Self {
        ReloadPolicy::ResetFlags
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct NotifiedFlags {
    start: bool,
    end: bool,
}

/// Scans tasks and reports the ones whose start or end time is close to the current time.
///
/// Each task start (resp. end) is reported once: the engine remembers which tasks have been notified already.
/// These flags are not part of the tasks, and are never sent to the backend.
#[derive(Clone, Debug)]
pub struct NotificationEngine {
    window: chrono::Duration,
    policy: ReloadPolicy,
    flags: HashMap<TaskId, NotifiedFlags>,
}

impl Default for NotificationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationEngine {
    /// An engine with the default window, that resets its flags on every reload
    pub fn new() -> Self {
        Self::with_settings(crate::config::notification_window(), ReloadPolicy::default())
    }

    pub fn with_settings(window: chrono::Duration, policy: ReloadPolicy) -> Self {
        Self {
            window,
            policy,
            flags: HashMap::new(),
        }
    }

    pub fn window(&self) -> chrono::Duration { self.window }
    pub fn policy(&self) -> ReloadPolicy     { self.policy }

    /// Returns the tasks that are starting or ending at `now`, and remember them so that they are not reported again.
    ///
    /// Completed tasks are ignored. Events come in the order of `tasks`, a `Starting` event before the `Ending` event of the same task.
    pub fn check_notifications<'a, I, Tz>(&mut self, tasks: I, now: &DateTime<Tz>) -> Vec<NotificationEvent>
    where
        I: IntoIterator<Item = &'a Task>,
        Tz: TimeZone,
    {
        let mut events = Vec::new();
        let tz = now.timezone();

        for task in tasks {
            if task.done() {
                continue;
            }

            let flags = self.flags.entry(task.id().clone()).or_default();

            if flags.start == false && is_within(task.start_time_in(&tz), now, self.window) {
                log::debug!("Task {} is starting", task.id());
                flags.start = true;
                events.push(NotificationEvent::new(NotificationKind::Starting, task));
            }

            if flags.end == false && is_within(task.end_time_in(&tz), now, self.window) {
                log::debug!("Task {} is ending", task.id());
                flags.end = true;
                events.push(NotificationEvent::new(NotificationKind::Ending, task));
            }
        }

        events
    }

    /// To be called whenever the task store has been replaced. This applies the [`ReloadPolicy`]
    pub fn on_reload(&mut self, store: &TaskStore) {
        match self.policy {
            ReloadPolicy::ResetFlags => self.reset(),
            ReloadPolicy::KeepFlags => {
                self.flags.retain(|id, _| store.contains(id));
            },
        }
    }

    /// Forget every flag
    pub fn reset(&mut self) {
        self.flags.clear();
    }

    /// Forget the flags of a single task
    pub fn forget(&mut self, id: &TaskId) {
        self.flags.remove(id);
    }

    pub fn is_start_notified(&self, id: &TaskId) -> bool {
        self.flags.get(id).map(|f| f.start).unwrap_or(false)
    }

    pub fn is_end_notified(&self, id: &TaskId) -> bool {
        self.flags.get(id).map(|f| f.end).unwrap_or(false)
    }
}

/// Whether `instant` is at most `window` away from `now` (in either direction)
fn is_within<Tz: TimeZone>(instant: Option<DateTime<Tz>>, now: &DateTime<Tz>, window: chrono::Duration) -> bool {
    match instant {
        None => false,
        Some(instant) => {
            let delta = instant.signed_duration_since(now.clone());
            delta <= window && delta >= -window
        },
    }
}
