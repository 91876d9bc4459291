use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::task::models::NewTask;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskPriority;
use crate::domain::task::models::TaskStatus;
use crate::domain::task::ports::TaskRepository;
use crate::domain::user::models::UserId;
use crate::task::errors::TaskError;

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TaskRow {
    id: i64,
    user_id: i64,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self) -> Result<Task, TaskError> {
        Ok(Task {
            id: TaskId(self.id),
            user_id: UserId(self.user_id),
            title: self.title,
            description: self.description,
            status: self.status.parse::<TaskStatus>()?,
            priority: self.priority.parse::<TaskPriority>()?,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, created_at, updated_at";

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: NewTask) -> Result<Task, TaskError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "INSERT INTO tasks (user_id, title, description, status, priority, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.user_id.0)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.into_task()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY id DESC"
        ))
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    async fn find_owned(&self, user_id: &UserId, id: &TaskId) -> Result<Option<Task>, TaskError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.0)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.map(TaskRow::into_task).transpose()
    }

    async fn update(&self, task: Task) -> Result<Task, TaskError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "UPDATE tasks \
             SET title = $3, description = $4, status = $5, priority = $6, due_date = $7, \
                 updated_at = now() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id.0)
        .bind(task.user_id.0)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => row.into_task(),
            None => Err(TaskError::NotFound(task.id.to_string())),
        }
    }

    async fn delete(&self, user_id: &UserId, id: &TaskId) -> Result<(), TaskError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
