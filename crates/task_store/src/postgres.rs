//! PostgreSQL task store implementation.
//!
//! Constraints live in the schema: unique email, foreign key with cascading
//! delete and a check on the status column. Violations reported by the
//! database are translated into the same error kinds the in-memory store
//! produces.
//!
//! The schema is created if missing when the store connects. Existing tables
//! are never altered, so changes to their definition need a manual
//! migration.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{NewTask, NewUser, Task, TaskId, TaskStatus, User, UserId};
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use sqlx::FromRow;

use crate::input::{check_new_task, check_new_user, check_status, parse_user_key};
use crate::{StoreMode, TaskStore, TaskStoreError, TaskStoreResult};

const SCHEMA_SQL: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        name TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'open'
            CHECK (status IN ('open', 'in_progress', 'done')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id)",
];

/// Database row for User
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

/// Database row for Task
#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    user_id: i64,
    title: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = TaskStoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = TaskStatus::parse(&row.status).ok_or_else(|| {
            TaskStoreError::Corrupt(format!("task {} has status {}", row.id, row.status))
        })?;
        Ok(Task {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            status,
            created_at: row.created_at,
        })
    }
}

/// Translates constraint violations into store error kinds.
fn translate(entity_type: &'static str, err: sqlx::Error) -> TaskStoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown").to_string();
        if db_err.is_unique_violation() {
            tracing::debug!(%constraint, "Unique violation");
            return TaskStoreError::conflict(entity_type, format!("{constraint} already in use"));
        }
        if db_err.is_foreign_key_violation() {
            tracing::debug!(%constraint, "Foreign key violation");
            return TaskStoreError::ForeignKeyViolation(constraint);
        }
        if db_err.is_check_violation() {
            return TaskStoreError::invalid_input(format!("{constraint} check failed"));
        }
    }
    TaskStoreError::Database(err)
}

/// Moves a table's identity sequence past an explicitly inserted id.
///
/// Runs on the connection that inserted the row so both commit together.
async fn advance_sequence(
    conn: &mut PgConnection,
    table: &'static str,
    id: i64,
) -> TaskStoreResult<()> {
    let sql = format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
         GREATEST($1, nextval(pg_get_serial_sequence('{table}', 'id'))))"
    );
    sqlx::query(&sql).bind(id).execute(conn).await?;
    Ok(())
}

/// PostgreSQL-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: PgPool,
}

impl PostgresTaskStore {
    /// Connects to the database and creates the schema if needed.
    pub async fn connect(database_url: &str, max_connections: u32) -> TaskStoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, creating the schema if needed.
    pub async fn from_pool(pool: PgPool) -> TaskStoreResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> TaskStoreResult<()> {
        for statement in SCHEMA_SQL {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Database schema verified");
        Ok(())
    }

    async fn user_exists(&self, id: UserId) -> TaskStoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    fn mode(&self) -> StoreMode {
        StoreMode::Postgres
    }

    async fn ping(&self) -> TaskStoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // =========================================================================
    // User operations
    // =========================================================================

    async fn list_users(&self) -> TaskStoreResult<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as("SELECT id, name, email FROM users ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create_user(&self, input: NewUser) -> TaskStoreResult<User> {
        let draft = check_new_user(input)?;

        let row: UserRow = match draft.id {
            Some(id) => {
                let mut tx = self.pool.begin().await?;
                let row = sqlx::query_as::<_, UserRow>(
                    "INSERT INTO users (id, name, email) VALUES ($1, $2, $3) \
                     RETURNING id, name, email",
                )
                .bind(id)
                .bind(&draft.name)
                .bind(&draft.email)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| translate("User", e))?;
                advance_sequence(&mut *tx, "users", id).await?;
                tx.commit().await?;
                row
            }
            None => sqlx::query_as::<_, UserRow>(
                "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email",
            )
            .bind(&draft.name)
            .bind(&draft.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| translate("User", e))?,
        };

        tracing::debug!(user_id = row.id, "User created");
        Ok(row.into())
    }

    async fn find_user(&self, key: &str) -> TaskStoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email FROM users WHERE id = $1 OR email = $2 \
             ORDER BY id ASC LIMIT 1",
        )
        .bind(parse_user_key(key))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn delete_user(&self, id: UserId) -> TaskStoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let found = result.rows_affected() > 0;
        if found {
            tracing::debug!(user_id = id, "User deleted");
        }
        Ok(found)
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    async fn list_tasks_for_user(&self, user_id: UserId) -> TaskStoreResult<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, user_id, title, description, status, created_at FROM tasks \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn create_task(&self, input: NewTask) -> TaskStoreResult<Task> {
        let draft = check_new_task(input)?;

        if !self.user_exists(draft.user_id).await? {
            return Err(TaskStoreError::ForeignKeyViolation(format!(
                "user does not exist: {}",
                draft.user_id
            )));
        }

        let row: TaskRow = match draft.id {
            Some(id) => {
                let mut tx = self.pool.begin().await?;
                let row = sqlx::query_as::<_, TaskRow>(
                    "INSERT INTO tasks (id, user_id, title, description, status) \
                     VALUES ($1, $2, $3, $4, $5) \
                     RETURNING id, user_id, title, description, status, created_at",
                )
                .bind(id)
                .bind(draft.user_id)
                .bind(&draft.title)
                .bind(&draft.description)
                .bind(draft.status.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| translate("Task", e))?;
                advance_sequence(&mut *tx, "tasks", id).await?;
                tx.commit().await?;
                row
            }
            None => sqlx::query_as::<_, TaskRow>(
                "INSERT INTO tasks (user_id, title, description, status) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, user_id, title, description, status, created_at",
            )
            .bind(draft.user_id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| translate("Task", e))?,
        };

        tracing::debug!(task_id = row.id, user_id = row.user_id, "Task created");
        row.try_into()
    }

    async fn find_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, user_id, title, description, status, created_at FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Task::try_from).transpose()
    }

    async fn update_task_status(&self, id: TaskId, status: &str) -> TaskStoreResult<bool> {
        let status = check_status(status)?;
        let result = sqlx::query("UPDATE tasks SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| translate("Task", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
