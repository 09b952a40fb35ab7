//! Health and instance endpoints for load balancers.

use std::{sync::Arc, time::Duration};

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use task_store::{StoreMode, TaskStore};

use crate::error::ServerResult;
use crate::state::AppState;

/// Delay used by `/slow` when `ms` is absent.
pub const DEFAULT_SLOW_MS: u64 = 200;

/// Upper bound on the `/slow` delay.
pub const MAX_SLOW_MS: u64 = 10_000;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub instance: String,
    pub mode: StoreMode,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub ts: DateTime<Utc>,
    pub instance: String,
    pub mode: StoreMode,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub mode: StoreMode,
}

#[derive(Debug, Deserialize)]
pub struct SlowQuery {
    pub ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SlowResponse {
    pub ok: bool,
    pub instance: String,
    pub delay_ms: u64,
    pub ts: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub instance: String,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    pub ts: DateTime<Utc>,
}

pub async fn root<S: TaskStore>(State(state): State<Arc<AppState<S>>>) -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok",
        instance: state.config.instance.clone(),
        mode: state.store.mode(),
    })
}

/// Liveness: the process is up.
pub async fn healthz<S: TaskStore>(State(state): State<Arc<AppState<S>>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        ts: Utc::now(),
        instance: state.config.instance.clone(),
        mode: state.store.mode(),
    })
}

/// Readiness: the store can serve requests.
pub async fn readyz<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
) -> (StatusCode, Json<ReadyResponse>) {
    let mode = state.store.mode();
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(ReadyResponse { ready: true, mode })),
        Err(e) => {
            tracing::warn!(error = %e, "Store not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse { ready: false, mode }),
            )
        }
    }
}

pub async fn whoami<S: TaskStore>(State(state): State<Arc<AppState<S>>>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        instance: state.config.instance.clone(),
        pid: std::process::id(),
        started_at: state.started_at,
        ts: Utc::now(),
    })
}

/// Clamps a requested delay to `MAX_SLOW_MS`.
fn slow_delay_ms(requested: Option<u64>) -> u64 {
    requested.unwrap_or(DEFAULT_SLOW_MS).min(MAX_SLOW_MS)
}

/// Answers after a delay, for exercising load balancer timeouts.
pub async fn slow<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<SlowQuery>, QueryRejection>,
) -> ServerResult<Json<SlowResponse>> {
    let Query(query) = query?;
    let delay_ms = slow_delay_ms(query.ms);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;

    Ok(Json(SlowResponse {
        ok: true,
        instance: state.config.instance.clone(),
        delay_ms,
        ts: Utc::now(),
    }))
}
