use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::list_tasks::TaskData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::TaskPriority;
use crate::domain::task::models::TaskStatus;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn create_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<CreateTaskRequestBody>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    state
        .task_service
        .create_task(&current.user.id, body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::CREATED, task.into()))
}

/// HTTP request body for creating a task (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTaskRequestBody {
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    due_date: Option<NaiveDate>,
}

impl CreateTaskRequestBody {
    fn into_command(self) -> CreateTaskCommand {
        CreateTaskCommand {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
        }
    }
}
