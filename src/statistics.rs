//! Aggregate counts over a collection of tasks

use std::fmt::{Display, Formatter};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::task::{Category, Priority, Task};

/// A point-in-time summary of a task collection.
///
/// Field names on the wire are the ones of the backend `/tasks/statistics` endpoint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    #[serde(rename = "totalTasks")]
    pub total: u64,
    #[serde(rename = "completedTasks")]
    pub completed: u64,
    #[serde(rename = "pendingTasks")]
    pub pending: u64,
    #[serde(rename = "highPriorityTasks")]
    pub high_priority: u64,
    #[serde(rename = "workTasks")]
    pub work: u64,
    #[serde(rename = "personalTasks")]
    pub personal: u64,
    #[serde(rename = "todayTasks")]
    pub today: u64,
    #[serde(rename = "overdueTasks")]
    pub overdue: u64,
}

/// Count tasks, as of `now`.
///
/// "Today" is the calendar date of `now`, in the time zone of `now`. Task times are read as wall-clock times of that zone too.
pub fn compute_statistics<'a, I, Tz>(tasks: I, now: &DateTime<Tz>) -> StatisticsSnapshot
where
    I: IntoIterator<Item = &'a Task>,
    Tz: TimeZone,
{
    let mut stats = StatisticsSnapshot::default();

    for task in tasks {
        stats.total += 1;
        if task.done() {
            stats.completed += 1;
        }
        if task.priority() == &Priority::High {
            stats.high_priority += 1;
        }
        match task.category() {
            Category::Work => stats.work += 1,
            Category::Personal => stats.personal += 1,
            Category::Other(_) => {},
        }
        if is_today(task, now) {
            stats.today += 1;
        }
        if is_overdue(task, now) {
            stats.overdue += 1;
        }
    }

    stats.pending = stats.total - stats.completed;
    stats
}

/// Whether a task starts on the same calendar date as `now`
pub fn is_today<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    task.start_time_in(&now.timezone())
        .map(|start| start.date_naive() == now.date_naive())
        .unwrap_or(false)
}

/// Whether a pending task should have ended before `now`
pub fn is_overdue<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    if task.done() {
        return false;
    }
    task.end_time_in(&now.timezone())
        .map(|end| &end < now)
        .unwrap_or(false)
}

impl Display for StatisticsSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total tasks:    {}", self.total)?;
        writeln!(f, "Completed:      {}", self.completed)?;
        writeln!(f, "Pending:        {}", self.pending)?;
        writeln!(f, "High priority:  {}", self.high_priority)?;
        writeln!(f, "Work:           {}", self.work)?;
        writeln!(f, "Personal:       {}", self.personal)?;
        writeln!(f, "Today:          {}", self.today)?;
        write!(f, "Overdue:        {}", self.overdue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, NaiveDate, Utc};
    use crate::task::TaskId;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600).unwrap()
            .with_ymd_and_hms(2024, 7, 10, 12, 0, 0).unwrap()
    }

    fn task(id: i64, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>,
            priority: Priority, category: Category, done: bool) -> Task {
        Task::new_with_parameters(TaskId::from(id), format!("task {}", id),
            Some(start.naive_local()), Some(end.naive_local()),
            priority, category, None, done)
    }

    #[test]
    fn empty_collection() {
        let tasks: Vec<Task> = Vec::new();
        let stats = compute_statistics(&tasks, &now());
        assert_eq!(stats, StatisticsSnapshot::default());
        assert_eq!(stats.pending, stats.total - stats.completed);
    }

    #[test]
    fn single_task_scenario() {
        let tasks = vec![task(1, now() + Duration::seconds(30), now() + Duration::hours(1),
            Priority::High, Category::Work, false)];
        let stats = compute_statistics(&tasks, &now());
        assert_eq!(stats, StatisticsSnapshot {
            total: 1,
            completed: 0,
            pending: 1,
            high_priority: 1,
            work: 1,
            personal: 0,
            today: 1,
            overdue: 0,
        });
    }

    #[test]
    fn mixed_collection() {
        let n = now();
        let tasks = vec![
            task(1, n - Duration::hours(3), n - Duration::hours(1), Priority::High, Category::Work, false),
            task(2, n - Duration::hours(3), n - Duration::hours(1), Priority::Low, Category::Personal, true),
            task(3, n + Duration::days(1), n + Duration::days(2), Priority::Medium, Category::Other("Errands".to_string()), false),
            task(4, n - Duration::days(2), n + Duration::hours(1), Priority::High, Category::Personal, false),
        ];

        let stats = compute_statistics(&tasks, &n);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.high_priority, 2);
        assert_eq!(stats.work, 1);
        assert_eq!(stats.personal, 2);
        assert_eq!(stats.today, 2);
        // the completed task 2 is past its end, but is not overdue
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn today_compares_calendar_dates_in_the_zone_of_now() {
        let n = now();
        let day = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        let early = day.and_hms_opt(0, 1, 0).unwrap();
        let late = day.and_hms_opt(23, 59, 0).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap().and_hms_opt(23, 59, 0).unwrap();

        let tasks: Vec<Task> = vec![early, late, yesterday].into_iter().enumerate()
            .map(|(i, t)| Task::new(TaskId::from(i as i64), "t".to_string(), t, t + Duration::minutes(1)))
            .collect();
        assert_eq!(compute_statistics(&tasks, &n).today, 2);

        // The same instant, seen from UTC, is still on July 10th at 17:00.
        // Task times are wall-clock times, so the same tasks are still "today" there
        let n_utc = n.with_timezone(&Utc);
        assert_eq!(compute_statistics(&tasks, &n_utc).today, 2);
    }

    #[test]
    fn statistics_are_idempotent() {
        let n = now();
        let tasks = vec![
            task(1, n, n + Duration::hours(1), Priority::High, Category::Work, false),
            task(2, n - Duration::days(1), n - Duration::hours(20), Priority::Low, Category::Personal, false),
        ];
        let first = compute_statistics(&tasks, &n);
        let second = compute_statistics(&tasks, &n);
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_times_are_neither_today_nor_overdue() {
        let tasks = vec![Task::new_with_parameters(TaskId::from(1), "?".to_string(),
            None, None, Priority::High, Category::Work, None, false)];
        let stats = compute_statistics(&tasks, &now());
        assert_eq!(stats.total, 1);
        assert_eq!(stats.today, 0);
        assert_eq!(stats.overdue, 0);
    }

    #[test]
    fn wire_names() {
        let stats = StatisticsSnapshot { total: 3, completed: 1, pending: 2, ..Default::default() };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["totalTasks"], 3);
        assert_eq!(value["completedTasks"], 1);
        assert_eq!(value["pendingTasks"], 2);
        assert_eq!(value["overdueTasks"], 0);
    }
}
