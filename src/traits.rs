use async_trait::async_trait;

use crate::error::Result;
use crate::task::{NewTask, Task, TaskId, TaskUpdate};

/// A place tasks can be read from and written to, e.g. a remote server.
///
/// "Not found" is never an error: methods that target a single task return `None` (or `false`) instead.
#[async_trait]
pub trait TaskSource {
    /// Returns every task this source contains, in the order the source chose
    async fn get_tasks(&self) -> Result<Vec<Task>>;

    /// Returns a single task, or `None` if it does not exist
    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>>;

    /// Create a task. The source assigns its ID, and returns the created task
    async fn add_task(&mut self, task: NewTask) -> Result<Task>;

    /// Replace the content of a task, and returns the updated task
    async fn update_task(&mut self, id: &TaskId, update: TaskUpdate) -> Result<Option<Task>>;

    /// Returns whether there was such a task to delete
    async fn delete_task(&mut self, id: &TaskId) -> Result<bool>;

    /// Flip the `done` flag of a task, and returns the updated task
    async fn toggle_task(&mut self, id: &TaskId) -> Result<Option<Task>>;
}
