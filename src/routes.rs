use std::sync::Arc;
use std::time::Duration;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use crate::handlers;
use crate::services::PassportDirectory;
use crate::state::AppState;

pub fn router(state: AppState, max_body_size: usize, request_timeout: Duration) -> Router {
    Router::new()
        // User routes
        .route("/users", post(handlers::add_user).get(handlers::list_users))
        .route("/users/:user_id", put(handlers::update_user).delete(handlers::delete_user))
        .route("/users/:user_id/tasks", get(handlers::get_user_tasks))

        // Task routes
        .route("/tasks/start", post(handlers::start_task))
        .route("/tasks/end", post(handlers::end_task))
        .route("/tasks/summary", get(handlers::get_task_summary))

        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .with_state(state)
}

pub fn user_info_router(directory: Arc<PassportDirectory>) -> Router {
    Router::new()
        .route("/userinfo", get(handlers::get_user_info))
        .layer(TraceLayer::new_for_http())
        .with_state(directory)
}
