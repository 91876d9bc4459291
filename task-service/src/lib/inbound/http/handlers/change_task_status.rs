use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::list_tasks::TaskData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskStatus;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn change_task_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
    Json(body): Json<ChangeStatusRequestBody>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    state
        .task_service
        .change_status(&current.user.id, &TaskId(task_id), body.status)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeStatusRequestBody {
    status: TaskStatus,
}
