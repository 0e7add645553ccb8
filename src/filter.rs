//! Local equivalents of the backend task queries

use chrono::{DateTime, TimeZone};

use crate::statistics::{is_overdue, is_today};
use crate::task::{Category, Priority, Task};

/// Tells which tasks should be retrieved
#[derive(Clone, Debug, PartialEq)]
pub enum SearchFilter {
    /// Return all tasks
    All,
    /// Return only completed (`true`) or pending (`false`) tasks
    Done(bool),
    Priority(Priority),
    Category(Category),
    /// Pending tasks whose end time has passed
    Overdue,
    /// Tasks starting today
    Today,
    /// Pending tasks starting within the next hour
    StartingSoon,
}

impl Default for SearchFilter {
    fn default() -> Self {
        SearchFilter::All
    }
}

impl SearchFilter {
    pub fn matches<Tz: TimeZone>(&self, task: &Task, now: &DateTime<Tz>) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::Done(done) => task.done() == *done,
            SearchFilter::Priority(p) => task.priority() == p,
            SearchFilter::Category(c) => task.category() == c,
            SearchFilter::Overdue => is_overdue(task, now),
            SearchFilter::Today => is_today(task, now),
            SearchFilter::StartingSoon => {
                if task.done() {
                    return false;
                }
                let horizon = now.clone() + crate::config::starting_soon_horizon();
                match task.start_time_in(&now.timezone()) {
                    None => false,
                    Some(start) => &start >= now && start <= horizon,
                }
            },
        }
    }
}

/// Returns the tasks that match a filter, in their original order
pub fn filter_tasks<'a, I, Tz>(tasks: I, filter: &SearchFilter, now: &DateTime<Tz>) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
    Tz: TimeZone,
{
    tasks.into_iter()
        .filter(|task| filter.matches(task, now))
        .collect()
}
