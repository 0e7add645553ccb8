//! This module provides a local task source, that keeps its tasks in memory and can store them in a file

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mock_behaviour::{MockBehaviour, Operation};
use crate::task::{NewTask, Task, TaskId, TaskUpdate};
use crate::traits::TaskSource;
use crate::utils::comparison::sort_like_backend;

/// A task source that behaves like the backend, but stores its tasks locally.
///
/// It is mostly useful for tests, and to work offline.
#[derive(Debug)]
pub struct Cache {
    backing_file: Option<PathBuf>,
    data: CachedData,

    mock_behaviour: Option<Mutex<MockBehaviour>>,
}

#[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
struct CachedData {
    tasks: Vec<Task>,
    next_id: i64,
}

impl Cache {
    /// An empty cache, that lives in memory only
    pub fn new() -> Self {
        Self {
            backing_file: None,
            data: CachedData { tasks: Vec::new(), next_id: 1 },
            mock_behaviour: None,
        }
    }

    /// An empty cache, that will be stored in `path` by [`Self::save_to_file`]
    pub fn new_with_file(path: &Path) -> Self {
        let mut cache = Self::new();
        cache.backing_file = Some(PathBuf::from(path));
        cache
    }

    /// Initialize a cache from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let data: CachedData = serde_json::from_reader(file)?;
        log::debug!("Loaded {} tasks from {:?}", data.tasks.len(), path);

        Ok(Self {
            backing_file: Some(PathBuf::from(path)),
            data,
            mock_behaviour: None,
        })
    }

    /// Store the current content to the backing file (if any)
    pub fn save_to_file(&self) -> Result<()> {
        let path = match &self.backing_file {
            None => {
                log::debug!("This cache has no backing file. Not saving it");
                return Ok(());
            },
            Some(path) => path,
        };

        let file = std::fs::File::create(path)?;
        serde_json::to_writer(file, &self.data)?;
        Ok(())
    }

    /// Make this cache fail on purpose, see [`MockBehaviour`]
    pub fn set_mock_behaviour(&mut self, behaviour: Option<MockBehaviour>) {
        self.mock_behaviour = behaviour.map(Mutex::new);
    }

    /// Insert a task as-is, e.g. to mimic a task created by another client.
    /// It replaces any task with the same ID
    pub fn insert_task(&mut self, task: Task) {
        if let Some(n) = task.id().as_number() {
            if n >= self.data.next_id {
                self.data.next_id = n.saturating_add(1);
            }
        }
        match self.position(task.id()) {
            Some(pos) => self.data.tasks[pos] = task,
            None => self.data.tasks.push(task),
        }
    }

    pub fn len(&self) -> usize {
        self.data.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.tasks.is_empty()
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.data.tasks.iter().position(|t| t.id() == id)
    }

    fn check_mock(&self, op: Operation) -> Result<()> {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(behaviour) => {
                let mut behaviour = behaviour.lock()
                    .map_err(|_| Error::Mocked("mock behaviour lock is poisoned".to_string()))?;
                behaviour.check(op)
            },
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskSource for Cache {
    async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.check_mock(Operation::GetTasks)?;
        let mut tasks = self.data.tasks.clone();
        sort_like_backend(&mut tasks);
        Ok(tasks)
    }

    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>> {
        self.check_mock(Operation::GetTask)?;
        Ok(self.position(id).map(|pos| self.data.tasks[pos].clone()))
    }

    async fn add_task(&mut self, task: NewTask) -> Result<Task> {
        self.check_mock(Operation::AddTask)?;
        let next_id = self.data.next_id.checked_add(1)
            .ok_or_else(|| Error::InvalidInput("no task ID is left in this cache".to_string()))?;
        let id = TaskId::from(self.data.next_id);
        self.data.next_id = next_id;

        let created = Task::from_new(id, task);
        log::debug!("Task {} added to the cache", created.id());
        self.data.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&mut self, id: &TaskId, update: TaskUpdate) -> Result<Option<Task>> {
        self.check_mock(Operation::UpdateTask)?;
        match self.position(id) {
            None => Ok(None),
            Some(pos) => {
                let task = &mut self.data.tasks[pos];
                task.apply_update(update);
                Ok(Some(task.clone()))
            },
        }
    }

    async fn delete_task(&mut self, id: &TaskId) -> Result<bool> {
        self.check_mock(Operation::DeleteTask)?;
        match self.position(id) {
            None => Ok(false),
            Some(pos) => {
                self.data.tasks.remove(pos);
                Ok(true)
            },
        }
    }

    async fn toggle_task(&mut self, id: &TaskId) -> Result<Option<Task>> {
        self.check_mock(Operation::ToggleTask)?;
        match self.position(id) {
            None => Ok(None),
            Some(pos) => {
                let task = &mut self.data.tasks[pos];
                let done = task.done();
                task.set_done(!done);
                Ok(Some(task.clone()))
            },
        }
    }
}
