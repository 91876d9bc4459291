use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::list_tasks::TaskData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::task::models::TaskId;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn get_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
) -> Result<ApiSuccess<TaskData>, ApiError> {
    state
        .task_service
        .get_task(&current.user.id, &TaskId(task_id))
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}
