//! Task management API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use entities::{NewTask, Task};
use serde::{Deserialize, Serialize};
use task_store::TaskStore;

use super::{parse_id, user::UserTasksResponse};
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Request to change a task's status.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Response for a status change.
#[derive(Debug, Serialize)]
pub struct UpdateTaskStatusResponse {
    pub ok: bool,
}

/// Creates a task.
pub async fn create_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Task>)> {
    let Json(request) = payload?;
    let task = state.store.create_task(request).await?;

    tracing::info!(task_id = task.id, user_id = task.user_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Gets a task by ID.
pub async fn get_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Task>> {
    let task_id = parse_id(&id, "task id")?;

    let task = state
        .store
        .find_task(task_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Lists a user's tasks without checking that the user exists.
pub async fn list_tasks_by_user<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> ServerResult<Json<UserTasksResponse>> {
    let user_id = parse_id(&user_id, "user id")?;

    let tasks = state.store.list_tasks_for_user(user_id).await?;

    Ok(Json(UserTasksResponse {
        user_id,
        total: tasks.len(),
        tasks,
    }))
}

/// Updates a task's status.
pub async fn update_task_status<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskStatusRequest>, JsonRejection>,
) -> ServerResult<Json<UpdateTaskStatusResponse>> {
    let task_id = parse_id(&id, "task id")?;
    let Json(request) = payload?;

    if !state.store.update_task_status(task_id, &request.status).await? {
        return Err(ServerError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id, status = %request.status, "Task status updated");

    Ok(Json(UpdateTaskStatusResponse { ok: true }))
}

/// Deletes a task.
pub async fn delete_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let task_id = parse_id(&id, "task id")?;

    if !state.store.delete_task(task_id).await? {
        return Err(ServerError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}
