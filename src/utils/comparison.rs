//! Utilities to compare tasks
//!
//! These can be used to sort results, e.g. with `sort_by`

use std::cmp::Ordering;

use crate::task::Task;

/// The order the backend returns tasks in: by priority (`High` first), then by end time.
///
/// Tasks with a malformed end time come last among tasks of the same priority
pub fn compare_by_priority_then_end(left: &Task, right: &Task) -> Ordering {
    left.priority().rank().cmp(&right.priority().rank())
        .then_with(|| match (left.end_time(), right.end_time()) {
            (Some(l), Some(r)) => l.cmp(r),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Sort tasks the way the backend does
pub fn sort_like_backend(tasks: &mut [Task]) {
    tasks.sort_by(compare_by_priority_then_end);
}
