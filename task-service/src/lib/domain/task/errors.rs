use thiserror::Error;

/// Error for TaskStatus parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskStatusError {
    #[error("Unknown task status: {0}")]
    Unknown(String),
}

/// Error for TaskPriority parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskPriorityError {
    #[error("Unknown task priority: {0}")]
    Unknown(String),
}

/// Top-level error for all task-related operations
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] TaskStatusError),

    #[error("Invalid priority: {0}")]
    InvalidPriority(#[from] TaskPriorityError),

    /// Also covers tasks owned by someone else: their existence is not
    /// revealed
    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
