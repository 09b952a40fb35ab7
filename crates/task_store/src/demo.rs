//! Demo data for running the service without a database.

use entities::{NewTask, NewUser};

use crate::{TaskStore, TaskStoreResult};

/// Inserts a couple of users and sample tasks through the public operations.
///
/// Works against any backend. Fails with `Conflict` if the demo emails are
/// already taken.
pub async fn seed_demo_data<S: TaskStore + ?Sized>(store: &S) -> TaskStoreResult<()> {
    let alice = store
        .create_user(NewUser::new("alice@example.com").with_name("Alice Silva"))
        .await?;
    let bob = store
        .create_user(NewUser::new("bob@example.com").with_name("Bob Santos"))
        .await?;

    store
        .create_task(
            NewTask::new(alice.id, "Buy groceries").with_description("Milk, bread and coffee"),
        )
        .await?;
    store
        .create_task(
            NewTask::new(alice.id, "Study for the exam")
                .with_description("Review distributed systems notes")
                .with_status("in_progress"),
        )
        .await?;
    store
        .create_task(
            NewTask::new(bob.id, "Configure nginx")
                .with_description("Adjust load balancing rules")
                .with_status("done"),
        )
        .await?;

    tracing::info!(users = 2, tasks = 3, "Demo data seeded");
    Ok(())
}
