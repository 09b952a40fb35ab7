//! Task store trait definitions.

use async_trait::async_trait;
use entities::{NewTask, NewUser, Task, TaskId, User, UserId};
use serde::Serialize;

use crate::TaskStoreResult;

/// Which backend is serving the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreMode {
    /// Transient process-local collections.
    Memory,
    /// Durable PostgreSQL database.
    Postgres,
}

impl StoreMode {
    /// Label reported by health endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for StoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for user and task storage operations.
///
/// Every backend classifies failures identically: missing or malformed input
/// is `InvalidInput`, uniqueness collisions are `Conflict` and a task whose
/// owner does not exist is `ForeignKeyViolation`. Absent entities are
/// reported through `Option` and `bool` results rather than errors.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns the backend serving this store.
    fn mode(&self) -> StoreMode;

    /// Checks that the backend can serve requests.
    async fn ping(&self) -> TaskStoreResult<()>;

    // =========================================================================
    // User operations
    // =========================================================================

    /// Lists all users ordered by identifier.
    async fn list_users(&self) -> TaskStoreResult<Vec<User>>;

    /// Creates a new user.
    async fn create_user(&self, input: NewUser) -> TaskStoreResult<User>;

    /// Finds a user whose identifier or email equals `key`.
    async fn find_user(&self, key: &str) -> TaskStoreResult<Option<User>>;

    /// Deletes a user together with every task it owns.
    ///
    /// Returns false if the user did not exist.
    async fn delete_user(&self, id: UserId) -> TaskStoreResult<bool>;

    // =========================================================================
    // Task operations
    // =========================================================================

    /// Lists a user's tasks, most recently created first.
    ///
    /// Does not check that the user exists.
    async fn list_tasks_for_user(&self, user_id: UserId) -> TaskStoreResult<Vec<Task>>;

    /// Creates a new task.
    async fn create_task(&self, input: NewTask) -> TaskStoreResult<Task>;

    /// Gets a task by ID.
    async fn find_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Sets a task's status.
    ///
    /// Returns false if the task did not exist.
    async fn update_task_status(&self, id: TaskId, status: &str) -> TaskStoreResult<bool>;

    /// Deletes a task.
    ///
    /// Returns false if the task did not exist.
    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<bool>;
}
