use std::time::Instant;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: i64,
    pub storage: StorageHealth,
}

/// Store health status
#[derive(Debug, Serialize, Deserialize)]
pub struct StorageHealth {
    pub backend: String,
    pub status: String,
    pub latency_ms: Option<u64>,
}

async fn probe_storage(state: &AppState) -> StorageHealth {
    let started = Instant::now();
    let backend = state.todos.backend().to_string();

    match state.todos.ping().await {
        Ok(()) => StorageHealth {
            backend,
            status: "healthy".to_string(),
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            warn!(backend = %backend, error = %e, "Storage ping failed");
            StorageHealth {
                backend,
                status: "unhealthy".to_string(),
                latency_ms: None,
            }
        }
    }
}

/// Health check
///
/// Returns 200 OK if the store answers a ping
/// Returns 503 Service Unavailable otherwise
pub async fn health_check(state: &AppState) -> Response {
    let storage = probe_storage(state).await;
    let healthy = storage.status == "healthy";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        storage,
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response)).into_response()
}

/// Liveness probe
///
/// 200 OK whenever the process can serve requests
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe
///
/// 200 OK when the store answers, 503 otherwise
pub async fn readiness(state: &AppState) -> StatusCode {
    match state.todos.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
