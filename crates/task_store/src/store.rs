//! Backend selection.

use async_trait::async_trait;
use entities::{NewTask, NewUser, Task, TaskId, User, UserId};

use crate::{MemoryTaskStore, PostgresTaskStore, StoreMode, TaskStore, TaskStoreResult};

/// The store chosen at startup.
///
/// Built once from the presence of a database URL and kept for the lifetime
/// of the process.
#[derive(Debug)]
pub enum AnyTaskStore {
    /// Transient in-memory backend.
    Memory(MemoryTaskStore),
    /// Durable PostgreSQL backend.
    Postgres(PostgresTaskStore),
}

impl AnyTaskStore {
    /// Selects PostgreSQL when a non-empty URL is given, memory otherwise.
    pub async fn from_database_url(
        database_url: Option<&str>,
        max_connections: u32,
    ) -> TaskStoreResult<Self> {
        match database_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => {
                tracing::info!("Connecting to PostgreSQL");
                let store = PostgresTaskStore::connect(url, max_connections).await?;
                Ok(Self::Postgres(store))
            }
            None => {
                tracing::info!(
                    "Running in memory mode, data is not persisted. \
                     Set DATABASE_URL for persistence"
                );
                Ok(Self::Memory(MemoryTaskStore::new()))
            }
        }
    }

    fn backend(&self) -> &dyn TaskStore {
        match self {
            Self::Memory(store) => store,
            Self::Postgres(store) => store,
        }
    }
}

#[async_trait]
impl TaskStore for AnyTaskStore {
    fn mode(&self) -> StoreMode {
        self.backend().mode()
    }

    async fn ping(&self) -> TaskStoreResult<()> {
        self.backend().ping().await
    }

    async fn list_users(&self) -> TaskStoreResult<Vec<User>> {
        self.backend().list_users().await
    }

    async fn create_user(&self, input: NewUser) -> TaskStoreResult<User> {
        self.backend().create_user(input).await
    }

    async fn find_user(&self, key: &str) -> TaskStoreResult<Option<User>> {
        self.backend().find_user(key).await
    }

    async fn delete_user(&self, id: UserId) -> TaskStoreResult<bool> {
        self.backend().delete_user(id).await
    }

    async fn list_tasks_for_user(&self, user_id: UserId) -> TaskStoreResult<Vec<Task>> {
        self.backend().list_tasks_for_user(user_id).await
    }

    async fn create_task(&self, input: NewTask) -> TaskStoreResult<Task> {
        self.backend().create_task(input).await
    }

    async fn find_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.backend().find_task(id).await
    }

    async fn update_task_status(&self, id: TaskId, status: &str) -> TaskStoreResult<bool> {
        self.backend().update_task_status(id, status).await
    }

    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<bool> {
        self.backend().delete_task(id).await
    }
}
