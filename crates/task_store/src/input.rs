//! Input checks shared by every backend.
//!
//! Run before any mutation so that rejected calls never leave partial state.

use entities::{is_non_empty, is_valid_status, NewTask, NewUser, TaskId, TaskStatus, UserId};

use crate::{TaskStoreError, TaskStoreResult};

pub(crate) struct UserDraft {
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
}

pub(crate) struct TaskDraft {
    pub id: Option<TaskId>,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

pub(crate) fn check_new_user(input: NewUser) -> TaskStoreResult<UserDraft> {
    if !is_non_empty(&input.email) {
        return Err(TaskStoreError::invalid_input("email is required"));
    }
    let id = check_explicit_id(input.id)?;

    Ok(UserDraft {
        id,
        name: input.name.unwrap_or_default(),
        email: input.email,
    })
}

pub(crate) fn check_new_task(input: NewTask) -> TaskStoreResult<TaskDraft> {
    let user_id = input
        .user_id
        .ok_or_else(|| TaskStoreError::invalid_input("user_id is required"))?;
    if !is_non_empty(&input.title) {
        return Err(TaskStoreError::invalid_input("title is required"));
    }
    let status = match input.status.as_deref() {
        Some(s) => check_status(s)?,
        None => TaskStatus::default(),
    };
    let id = check_explicit_id(input.id)?;

    Ok(TaskDraft {
        id,
        user_id,
        title: input.title,
        description: input.description.unwrap_or_default(),
        status,
    })
}

pub(crate) fn check_status(status: &str) -> TaskStoreResult<TaskStatus> {
    let invalid = || TaskStoreError::invalid_input(format!("invalid status: {status}"));
    if !is_valid_status(status) {
        return Err(invalid());
    }
    TaskStatus::parse(status).ok_or_else(invalid)
}

/// Interprets a lookup key as a user identifier, if it is one.
pub(crate) fn parse_user_key(key: &str) -> Option<UserId> {
    key.trim().parse().ok()
}

/// Explicit ids must be positive and leave room for the next assigned id.
fn check_explicit_id(id: Option<i64>) -> TaskStoreResult<Option<i64>> {
    match id {
        Some(id) if id <= 0 => Err(TaskStoreError::invalid_input(format!(
            "identifier must be positive: {id}"
        ))),
        Some(id) if id.checked_add(1).is_none() => Err(TaskStoreError::invalid_input(format!(
            "identifier out of range: {id}"
        ))),
        other => Ok(other),
    }
}
