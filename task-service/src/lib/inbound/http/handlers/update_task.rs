use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::list_tasks::TaskData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskPriority;
use crate::domain::task::models::TaskStatus;
use crate::domain::task::models::UpdateTaskCommand;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// Serves both PUT and PATCH; either way only the provided fields change.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
    Json(body): Json<UpdateTaskRequestBody>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    state
        .task_service
        .update_task(&current.user.id, &TaskId(task_id), body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}

/// HTTP request body for updating a task (raw JSON, all fields optional)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateTaskRequestBody {
    title: Option<String>,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    due_date: Option<NaiveDate>,
}

impl UpdateTaskRequestBody {
    fn into_command(self) -> UpdateTaskCommand {
        UpdateTaskCommand {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
        }
    }
}
