use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::extract_bearer_token;
use crate::inbound::http::router::AppState;

/// Logout by revoking the presented token.
///
/// Always reports success once a bearer header is present: a token that fails
/// to decode simply no-ops, with `revoked: false` in the body. Logout must
/// never abort the caller's flow.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<LogoutResponseData>, ApiError> {
    let token =
        extract_bearer_token(&headers).map_err(|message| ApiError::Unauthorized(message.to_string()))?;

    let revoked = state.user_service.logout(token);

    Ok(ApiSuccess::new(StatusCode::OK, LogoutResponseData { revoked }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub revoked: bool,
}
