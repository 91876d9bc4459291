use async_trait::async_trait;

use crate::domain::task::models::NewTask;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::user::models::UserId;
use crate::task::errors::TaskError;

/// Persistence operations for tasks. Every read and write is scoped to the
/// owning user.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    /// Persist a new task; storage assigns id and timestamps.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, task: NewTask) -> Result<Task, TaskError>;

    /// All tasks owned by `user_id`, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError>;

    /// Retrieve a task iff it is owned by `user_id`.
    ///
    /// # Returns
    /// Optional task (None if absent or owned by someone else)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_owned(&self, user_id: &UserId, id: &TaskId) -> Result<Option<Task>, TaskError>;

    /// Update an existing task, scoped to its owner.
    ///
    /// # Errors
    /// * `NotFound` - Task absent or owned by someone else
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, task: Task) -> Result<Task, TaskError>;

    /// Delete a task iff it is owned by `user_id`.
    ///
    /// # Errors
    /// * `NotFound` - Task absent or owned by someone else
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, user_id: &UserId, id: &TaskId) -> Result<(), TaskError>;
}
