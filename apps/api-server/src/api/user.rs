//! User management API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use entities::{NewUser, Task, User, UserId};
use serde::Serialize;
use task_store::TaskStore;

use super::parse_id;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Response for listing users.
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub total: usize,
    pub users: Vec<User>,
}

/// Response for listing a user's tasks.
#[derive(Debug, Serialize)]
pub struct UserTasksResponse {
    pub user_id: UserId,
    pub total: usize,
    pub tasks: Vec<Task>,
}

/// Lists users.
pub async fn list_users<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<ListUsersResponse>> {
    let users = state.store.list_users().await?;

    Ok(Json(ListUsersResponse {
        total: users.len(),
        users,
    }))
}

/// Creates a user.
pub async fn create_user<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<User>)> {
    let Json(request) = payload?;
    let user = state.store.create_user(request).await?;

    tracing::info!(user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Gets a user by ID or email.
pub async fn get_user<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(key): Path<String>,
) -> ServerResult<Json<User>> {
    let user = state
        .store
        .find_user(&key)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Deletes a user and its tasks.
pub async fn delete_user<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let user_id = parse_id(&id, "user id")?;

    if !state.store.delete_user(user_id).await? {
        return Err(ServerError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the tasks of an existing user.
pub async fn list_user_tasks<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<UserTasksResponse>> {
    let user_id = parse_id(&id, "user id")?;

    // Verify user exists
    state
        .store
        .find_user(&user_id.to_string())
        .await?
        .filter(|u| u.id == user_id)
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    let tasks = state.store.list_tasks_for_user(user_id).await?;

    Ok(Json(UserTasksResponse {
        user_id,
        total: tasks.len(),
        tasks,
    }))
}
