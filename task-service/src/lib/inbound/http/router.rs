use std::sync::Arc;
use std::time::Duration;

use auth::AuthService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_task_status::change_task_status;
use super::handlers::create_task::create_task;
use super::handlers::delete_task::delete_task;
use super::handlers::get_task::get_task;
use super::handlers::list_tasks::list_tasks;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::register::register;
use super::handlers::update_task::update_task;
use super::middleware::authenticate as auth_middleware;
use crate::domain::task::service::TaskService;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::PostgresTaskRepository;
use crate::outbound::repositories::PostgresUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub user_service: Arc<UserService<PostgresUserRepository>>,
    pub task_service: Arc<TaskService<PostgresTaskRepository>>,
}

pub fn create_router(
    auth: Arc<AuthService>,
    user_service: Arc<UserService<PostgresUserRepository>>,
    task_service: Arc<TaskService<PostgresTaskRepository>>,
) -> Router {
    let state = AppState {
        auth,
        user_service,
        task_service,
    };

    // Logout is public on purpose: it must succeed even when the presented
    // token is expired or undecodable
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout));

    let protected_routes = Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:task_id",
            get(get_task)
                .put(update_task)
                .patch(update_task)
                .delete(delete_task),
        )
        .route("/api/tasks/:task_id/status", patch(change_task_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
