use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Extension type carrying the resolved identity through protected requests.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

/// Middleware guarding protected routes: validates the bearer token and
/// resolves its subject to a persisted user.
///
/// Outcomes are deliberately distinct: missing/expired/revoked/tampered tokens
/// are 401, while a valid token naming a user that no longer exists is 404 -
/// the token was fine; the identity is gone.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(req.headers())
        .map_err(|message| unauthorized(message).into_response())?;

    let verification = state.auth.verify_token(token);
    let Some(claims) = verification.claims() else {
        tracing::warn!(
            reason = verification.reason().unwrap_or("unknown"),
            "token failed verification"
        );
        return Err(unauthorized("Invalid or expired token").into_response());
    };

    let user_id = UserId::from_subject(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "token subject is not a user id");
        unauthorized("Invalid token format").into_response()
    })?;

    let user = state.user_service.get_user(&user_id).await.map_err(|e| {
        match e {
            // Valid token, vanished identity: not an authentication failure
            UserError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "User not found"
                })),
            )
                .into_response(),
            other => {
                tracing::error!(error = %other, "identity lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
                    .into_response()
            }
        }
    })?;

    req.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(req).await)
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// Absence or a wrong scheme is a client error reported by the caller; this
/// never panics on malformed headers.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Invalid Authorization header format. Expected: Bearer <token>")?;

    Ok(token)
}

fn unauthorized(message: &str) -> impl IntoResponse + '_ {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
}
