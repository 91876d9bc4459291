use auth::IssuedToken;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<IssuedToken>, ApiError> {
    // An unparseable email cannot match an account; report it exactly like a
    // failed login
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    state
        .user_service
        .login(&email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|(_user, issued)| ApiSuccess::new(StatusCode::OK, issued))
}

/// HTTP request body for login (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}
