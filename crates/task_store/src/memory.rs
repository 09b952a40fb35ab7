//! In-memory task store implementation.
//!
//! Emulates the relational constraints by hand: uniqueness by scanning,
//! ownership by lookup before insert and cascading delete by filtering the
//! task collection in the same critical section that removes the user.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{NewTask, NewUser, Task, TaskId, User, UserId};
use tokio::sync::RwLock;

use crate::input::{check_new_task, check_new_user, check_status, parse_user_key};
use crate::{StoreMode, TaskStore, TaskStoreError, TaskStoreResult};

#[derive(Debug)]
struct Collections {
    users: BTreeMap<UserId, User>,
    tasks: BTreeMap<TaskId, Task>,
    next_user_id: UserId,
    next_task_id: TaskId,
    last_created_at: Option<DateTime<Utc>>,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            tasks: BTreeMap::new(),
            next_user_id: 1,
            next_task_id: 1,
            last_created_at: None,
        }
    }
}

impl Collections {
    /// Returns the identifier to use and advances the counter past it.
    ///
    /// The counter is only moved when the id is actually claimed, so an
    /// exhausted counter leaves no state behind.
    fn claim_id(
        next: &mut i64,
        requested: Option<i64>,
        entity_type: &'static str,
    ) -> TaskStoreResult<i64> {
        let id = requested.unwrap_or(*next);
        if id >= *next {
            *next = id.checked_add(1).ok_or(TaskStoreError::Exhausted(entity_type))?;
        }
        Ok(id)
    }

    /// Wall-clock time, clamped so insertion order never goes backwards.
    fn created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }
}

/// In-memory task store for demos and tests.
///
/// Both collections sit behind a single lock, so each check-then-write
/// sequence runs as one critical section.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    inner: RwLock<Collections>,
}

impl MemoryTaskStore {
    /// Creates a new, empty in-memory task store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Memory
    }

    async fn ping(&self) -> TaskStoreResult<()> {
        Ok(())
    }

    // =========================================================================
    // User operations
    // =========================================================================

    async fn list_users(&self) -> TaskStoreResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().cloned().collect())
    }

    async fn create_user(&self, input: NewUser) -> TaskStoreResult<User> {
        let draft = check_new_user(input)?;
        let mut inner = self.inner.write().await;

        if let Some(id) = draft.id {
            if inner.users.contains_key(&id) {
                return Err(TaskStoreError::conflict(
                    "User",
                    format!("id already in use: {id}"),
                ));
            }
        }
        if inner.users.values().any(|u| u.email == draft.email) {
            return Err(TaskStoreError::conflict(
                "User",
                format!("email already in use: {}", draft.email),
            ));
        }

        let id = Collections::claim_id(&mut inner.next_user_id, draft.id, "User")?;
        let user = User {
            id,
            name: draft.name,
            email: draft.email,
        };
        inner.users.insert(id, user.clone());

        tracing::debug!(user_id = id, "User created");
        Ok(user)
    }

    async fn find_user(&self, key: &str) -> TaskStoreResult<Option<User>> {
        let inner = self.inner.read().await;
        let id = parse_user_key(key);
        Ok(inner
            .users
            .values()
            .find(|u| Some(u.id) == id || u.email == key)
            .cloned())
    }

    async fn delete_user(&self, id: UserId) -> TaskStoreResult<bool> {
        let mut inner = self.inner.write().await;
        if inner.users.remove(&id).is_none() {
            return Ok(false);
        }

        let before = inner.tasks.len();
        inner.tasks.retain(|_, t| t.user_id != id);
        let removed = before - inner.tasks.len();

        tracing::debug!(user_id = id, removed_tasks = removed, "User deleted");
        Ok(true)
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    async fn list_tasks_for_user(&self, user_id: UserId) -> TaskStoreResult<Vec<Task>> {
        let inner = self.inner.read().await;
        let mut result: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(result)
    }

    async fn create_task(&self, input: NewTask) -> TaskStoreResult<Task> {
        let draft = check_new_task(input)?;
        let mut inner = self.inner.write().await;

        if !inner.users.contains_key(&draft.user_id) {
            return Err(TaskStoreError::ForeignKeyViolation(format!(
                "user does not exist: {}",
                draft.user_id
            )));
        }
        if let Some(id) = draft.id {
            if inner.tasks.contains_key(&id) {
                return Err(TaskStoreError::conflict(
                    "Task",
                    format!("id already in use: {id}"),
                ));
            }
        }

        let id = Collections::claim_id(&mut inner.next_task_id, draft.id, "Task")?;
        let created_at = inner.created_at();
        let task = Task {
            id,
            user_id: draft.user_id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            created_at,
        };
        inner.tasks.insert(id, task.clone());

        tracing::debug!(task_id = id, user_id = task.user_id, "Task created");
        Ok(task)
    }

    async fn find_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.get(&id).cloned())
    }

    async fn update_task_status(&self, id: TaskId, status: &str) -> TaskStoreResult<bool> {
        let status = check_status(status)?;
        let mut inner = self.inner.write().await;
        match inner.tasks.get_mut(&id) {
            Some(task) => {
                task.status = status;
                tracing::debug!(task_id = id, status = %status, "Task status updated");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.remove(&id).is_some())
    }
}
