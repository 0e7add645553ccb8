//! The in-memory snapshot of the tasks known to a session

use std::collections::HashSet;

use crate::task::{Task, TaskId};

/// An ordered collection of tasks, with unique IDs.
///
/// It is never patched: every refresh replaces the whole content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    /// How many times this store has been replaced
    generation: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of tasks, see [`Self::replace`]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        store.replace(tasks);
        store
    }

    /// Replace the whole content of this store.
    ///
    /// In case the same ID appears more than once, only its first occurrence is kept.
    pub fn replace(&mut self, tasks: Vec<Task>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(tasks.len());
        for task in tasks {
            if seen.insert(task.id().clone()) {
                kept.push(task);
            } else {
                log::warn!("Task {} appears more than once in the snapshot. Ignoring the duplicate", task.id());
            }
        }

        log::debug!("Task store now holds {} tasks", kept.len());
        self.tasks = kept;
        self.generation += 1;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<'a> IntoIterator for &'a TaskStore {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: i64, description: &str) -> Task {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        Task::new(TaskId::from(id), description.to_string(), t, t)
    }

    #[test]
    fn replace_is_wholesale_and_deduplicates() {
        let mut store = TaskStore::from_tasks(vec![task(1, "a"), task(2, "b")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.generation(), 1);

        store.replace(vec![task(3, "c"), task(3, "c bis"), task(4, "d")]);
        assert_eq!(store.generation(), 2);
        assert_eq!(store.len(), 2);
        assert!(store.contains(&TaskId::from(1)) == false);
        assert_eq!(store.get(&TaskId::from(3)).unwrap().description(), "c");

        let ids: Vec<String> = store.iter().map(|t| t.id().to_string()).collect();
        assert_eq!(ids, vec!["3", "4"]);
    }

    #[test]
    fn empty_store() {
        let store = TaskStore::new();
        assert!(store.is_empty());
        assert_eq!(store.generation(), 0);
        assert!(store.get(&TaskId::from(1)).is_none());
    }
}
