use axum::{extract::State, http::StatusCode, response::Response};
use tracing::{info, instrument};

use crate::controllayer::health;
use crate::state::AppState;

#[instrument(skip(state), fields(service = "/health"))]
pub async fn health_check(State(state): State<AppState>) -> Response {
    info!("Health check request received");
    health::health_check(&state).await
}

#[instrument(fields(service = "/health/live"))]
pub async fn liveness() -> StatusCode {
    health::liveness().await
}

#[instrument(skip(state), fields(service = "/health/ready"))]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    health::readiness(&state).await
}
