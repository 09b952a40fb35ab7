//! Behavior every backend must share.
//!
//! The memory backend always runs. The PostgreSQL backend runs when
//! `TEST_DATABASE_URL` points at a database the tests may create tables in.
//! Scenarios use unique emails so they tolerate a database that already
//! holds data.

use std::sync::atomic::{AtomicU64, Ordering};

use entities::{NewTask, NewUser, TaskStatus, User};
use task_store::{ErrorKind, MemoryTaskStore, PostgresTaskStore, TaskStore};

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_email(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{n}@example.com")
}

async fn postgres_store() -> Option<PostgresTaskStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    Some(PostgresTaskStore::connect(&url, 2).await.unwrap())
}

async fn new_user<S: TaskStore>(store: &S) -> User {
    store
        .create_user(NewUser::new(unique_email("user")).with_name("Test"))
        .await
        .unwrap()
}

async fn duplicate_email_conflicts<S: TaskStore>(store: &S) {
    let email = unique_email("dup");
    store.create_user(NewUser::new(email.clone())).await.unwrap();

    let err = store.create_user(NewUser::new(email.clone())).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let matching = store
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .filter(|u| u.email == email)
        .count();
    assert_eq!(matching, 1);
}

async fn duplicate_user_id_conflicts<S: TaskStore>(store: &S) {
    let user = new_user(store).await;
    let err = store
        .create_user(NewUser::new(unique_email("other")).with_id(user.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

async fn missing_email_is_invalid<S: TaskStore>(store: &S) {
    let err = store.create_user(NewUser::new("")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

async fn find_user_by_id_or_email<S: TaskStore>(store: &S) {
    let user = new_user(store).await;

    let by_id = store.find_user(&user.id.to_string()).await.unwrap();
    let by_email = store.find_user(&user.email).await.unwrap();
    assert_eq!(by_id.as_ref(), Some(&user));
    assert_eq!(by_email.as_ref(), Some(&user));

    assert!(store.find_user(&unique_email("nobody")).await.unwrap().is_none());
}

async fn new_task_is_open_with_timestamp<S: TaskStore>(store: &S) {
    let user = new_user(store).await;
    let created = store.create_task(NewTask::new(user.id, "t")).await.unwrap();

    let tasks = store.list_tasks_for_user(user.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, created.id);
    assert_eq!(tasks[0].status, TaskStatus::Open);
    assert_eq!(tasks[0].description, "");
    assert_eq!(tasks[0].created_at, created.created_at);
}

async fn tasks_listed_newest_first<S: TaskStore>(store: &S) {
    let user = new_user(store).await;
    let first = store.create_task(NewTask::new(user.id, "first")).await.unwrap();
    let second = store.create_task(NewTask::new(user.id, "second")).await.unwrap();

    let ids: Vec<i64> = store
        .list_tasks_for_user(user.id)
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

async fn missing_owner_is_foreign_key_violation<S: TaskStore>(store: &S) {
    let gone = new_user(store).await;
    assert!(store.delete_user(gone.id).await.unwrap());

    let err = store.create_task(NewTask::new(gone.id, "t")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ForeignKeyViolation);
    assert!(store.list_tasks_for_user(gone.id).await.unwrap().is_empty());
}

async fn missing_title_is_invalid<S: TaskStore>(store: &S) {
    let user = new_user(store).await;
    let err = store.create_task(NewTask::new(user.id, " ")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

async fn duplicate_task_id_conflicts<S: TaskStore>(store: &S) {
    let user = new_user(store).await;
    let task = store.create_task(NewTask::new(user.id, "t")).await.unwrap();

    let err = store
        .create_task(NewTask::new(user.id, "again").with_id(task.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

async fn delete_user_cascades<S: TaskStore>(store: &S) {
    let user = new_user(store).await;
    let t1 = store.create_task(NewTask::new(user.id, "one")).await.unwrap();
    let t2 = store.create_task(NewTask::new(user.id, "two")).await.unwrap();

    assert!(store.delete_user(user.id).await.unwrap());
    assert!(!store.delete_user(user.id).await.unwrap());

    assert!(store.list_tasks_for_user(user.id).await.unwrap().is_empty());
    assert!(store.find_task(t1.id).await.unwrap().is_none());
    assert!(store.find_task(t2.id).await.unwrap().is_none());
}

async fn status_outside_enumeration_is_rejected<S: TaskStore>(store: &S) {
    let user = new_user(store).await;
    let task = store.create_task(NewTask::new(user.id, "t")).await.unwrap();

    let err = store.update_task_status(task.id, "archived").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    let stored = store.find_task(task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Open);

    assert!(store.update_task_status(task.id, "done").await.unwrap());
    let stored = store.find_task(task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Done);
}

async fn absent_task_operations_return_false<S: TaskStore>(store: &S) {
    let user = new_user(store).await;
    let task = store.create_task(NewTask::new(user.id, "t")).await.unwrap();
    assert!(store.delete_task(task.id).await.unwrap());

    assert!(!store.delete_task(task.id).await.unwrap());
    assert!(!store.delete_task(task.id).await.unwrap());
    assert!(!store.update_task_status(task.id, "done").await.unwrap());
    assert!(store.find_task(task.id).await.unwrap().is_none());
}

async fn exhausting_id_is_invalid<S: TaskStore>(store: &S) {
    let email = unique_email("max");
    let err = store
        .create_user(NewUser::new(email.clone()).with_id(i64::MAX))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(store.find_user(&email).await.unwrap().is_none());

    let user = new_user(store).await;
    assert!(user.id > 0);

    let err = store
        .create_task(NewTask::new(user.id, "t").with_id(i64::MAX))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(store.list_tasks_for_user(user.id).await.unwrap().is_empty());

    let task = store.create_task(NewTask::new(user.id, "t")).await.unwrap();
    assert!(task.id > 0);
}

async fn explicit_ids_push_assigned_ids_forward<S: TaskStore>(store: &S) {
    let user = new_user(store).await;
    let explicit = store
        .create_user(NewUser::new(unique_email("explicit")).with_id(user.id + 100))
        .await
        .unwrap();
    assert_eq!(explicit.id, user.id + 100);
    let after = new_user(store).await;
    assert!(after.id > explicit.id);

    let task = store.create_task(NewTask::new(user.id, "t")).await.unwrap();
    let explicit_task = store
        .create_task(NewTask::new(user.id, "t").with_id(task.id + 100))
        .await
        .unwrap();
    assert_eq!(explicit_task.id, task.id + 100);
    let after_task = store.create_task(NewTask::new(user.id, "t")).await.unwrap();
    assert!(after_task.id > explicit_task.id);
}

async fn run_all<S: TaskStore>(store: &S) {
    duplicate_email_conflicts(store).await;
    duplicate_user_id_conflicts(store).await;
    missing_email_is_invalid(store).await;
    find_user_by_id_or_email(store).await;
    new_task_is_open_with_timestamp(store).await;
    tasks_listed_newest_first(store).await;
    missing_owner_is_foreign_key_violation(store).await;
    missing_title_is_invalid(store).await;
    duplicate_task_id_conflicts(store).await;
    delete_user_cascades(store).await;
    status_outside_enumeration_is_rejected(store).await;
    absent_task_operations_return_false(store).await;
    exhausting_id_is_invalid(store).await;
    explicit_ids_push_assigned_ids_forward(store).await;
}

#[tokio::test]
async fn test_memory_backend() {
    run_all(&MemoryTaskStore::new()).await;
}

#[tokio::test]
async fn test_postgres_backend() {
    let Some(store) = postgres_store().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL backend");
        return;
    };
    run_all(&store).await;
}

#[tokio::test]
async fn test_memory_starts_empty() {
    let store = MemoryTaskStore::new();
    assert!(store.list_users().await.unwrap().is_empty());

    let user = store.create_user(NewUser::new("a@x.com")).await.unwrap();
    let err = store.create_user(NewUser::new("a@x.com")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    store.create_task(NewTask::new(user.id, "t")).await.unwrap();
    let tasks = store.list_tasks_for_user(user.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Open);
}
