//! API endpoints.

pub mod health;
pub mod task;
pub mod user;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use task_store::TaskStore;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: TaskStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // User endpoints
        .route("/users", get(user::list_users).post(user::create_user))
        .route("/users/:id", get(user::get_user).delete(user::delete_user))
        .route("/users/:id/tasks", get(user::list_user_tasks))
        // Task endpoints
        .route("/tasks", post(task::create_task))
        .route("/tasks/:id", get(task::get_task).delete(task::delete_task))
        .route("/tasks/:id/status", put(task::update_task_status))
        .route("/tasks/user/:user_id", get(task::list_tasks_by_user))
        // Health check
        .route("/", get(health::root))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/whoami", get(health::whoami))
        .route("/slow", get(health::slow))
}

/// Parses a path segment into an entity identifier.
fn parse_id(raw: &str, what: &str) -> ServerResult<i64> {
    raw.parse()
        .map_err(|_| ServerError::InvalidRequest(format!("Invalid {what}: {raw}")))
}
