//! Task tracker API server binary.

use std::net::SocketAddr;

use api_server::{config::Config, create_app, create_state, init_tracing};
use task_store::{AnyTaskStore, TaskStore, seed_demo_data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(instance = %config.instance, "Starting task tracker API server");

    // Backend is fixed for the lifetime of the process
    let store = AnyTaskStore::from_database_url(
        config.database_url.as_deref(),
        config.database_max_connections,
    )
    .await?;

    if config.seed_demo_data {
        seed_demo_data(&store).await?;
    }

    tracing::info!(mode = %store.mode(), "Task store ready");

    let state = create_state(config.clone(), store);
    let app = create_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
