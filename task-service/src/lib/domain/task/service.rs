use std::sync::Arc;

use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::NewTask;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskStatus;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::user::models::UserId;
use crate::task::errors::TaskError;
use crate::task::ports::TaskRepository;

/// Domain service for ownership-scoped task operations.
///
/// The caller supplies the authenticated user's id; tasks belonging to anyone
/// else are indistinguishable from missing ones.
pub struct TaskService<TR>
where
    TR: TaskRepository,
{
    repository: Arc<TR>,
}

impl<TR> TaskService<TR>
where
    TR: TaskRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }

    /// Create a task for `user_id`, applying status/priority defaults for
    /// omitted fields.
    pub async fn create_task(
        &self,
        user_id: &UserId,
        command: CreateTaskCommand,
    ) -> Result<Task, TaskError> {
        self.repository
            .create(NewTask {
                user_id: *user_id,
                title: command.title,
                description: command.description,
                status: command.status.unwrap_or_default(),
                priority: command.priority.unwrap_or_default(),
                due_date: command.due_date,
            })
            .await
    }

    /// All of the user's tasks, newest first.
    pub async fn list_tasks(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError> {
        self.repository.list_for_user(user_id).await
    }

    /// # Errors
    /// * `NotFound` - Task absent or owned by someone else
    pub async fn get_task(&self, user_id: &UserId, id: &TaskId) -> Result<Task, TaskError> {
        self.repository
            .find_owned(user_id, id)
            .await?
            .ok_or(TaskError::NotFound(id.to_string()))
    }

    /// Partial update: only fields present in the command are touched.
    ///
    /// # Errors
    /// * `NotFound` - Task absent or owned by someone else
    pub async fn update_task(
        &self,
        user_id: &UserId,
        id: &TaskId,
        command: UpdateTaskCommand,
    ) -> Result<Task, TaskError> {
        let mut task = self.get_task(user_id, id).await?;

        if let Some(title) = command.title {
            task.title = title;
        }
        if let Some(description) = command.description {
            task.description = Some(description);
        }
        if let Some(status) = command.status {
            task.status = status;
        }
        if let Some(priority) = command.priority {
            task.priority = priority;
        }
        if let Some(due_date) = command.due_date {
            task.due_date = Some(due_date);
        }

        self.repository.update(task).await
    }

    /// Flip just the status of an owned task.
    ///
    /// # Errors
    /// * `NotFound` - Task absent or owned by someone else
    pub async fn change_status(
        &self,
        user_id: &UserId,
        id: &TaskId,
        status: TaskStatus,
    ) -> Result<Task, TaskError> {
        let mut task = self.get_task(user_id, id).await?;
        task.status = status;
        self.repository.update(task).await
    }

    /// # Errors
    /// * `NotFound` - Task absent or owned by someone else
    pub async fn delete_task(&self, user_id: &UserId, id: &TaskId) -> Result<(), TaskError> {
        self.repository.delete(user_id, id).await
    }
}
