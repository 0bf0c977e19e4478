use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json;
use todo_views_backend::{
    config::{ApiSettings, StorageBackend},
    controllayer::health::{HealthResponse, StorageHealth},
    routes::create_router,
    state::AppState,
};
use tower::ServiceExt;

/// Helper function to create the application router over an in-memory store
fn create_test_router() -> Router {
    let settings = ApiSettings::new()
        .set_storage(StorageBackend::Memory)
        .without_admin();
    create_router(AppState::in_memory(settings))
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check_returns_200() {
    let response = get(create_test_router(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_check_response_structure() {
    let response = get(create_test_router(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health_response: HealthResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health_response.status, "healthy");
    assert_eq!(health_response.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health_response.storage.backend, "memory");
    assert_eq!(health_response.storage.status, "healthy");
    assert!(health_response.storage.latency_ms.is_some());

    // Timestamp should be recent (within last 10 seconds)
    let now = chrono::Utc::now().timestamp();
    assert!(health_response.timestamp <= now);
    assert!(health_response.timestamp >= now - 10);
}

#[tokio::test]
async fn test_health_check_json_content_type() {
    let response = get(create_test_router(), "/health").await;

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    assert!(content_type.unwrap().contains("application/json"));
}

#[tokio::test]
async fn test_health_check_carries_request_id() {
    let response = get(create_test_router(), "/health").await;
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_liveness_probe_no_body() {
    let response = get(create_test_router(), "/health/live").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body.len(), 0);
}

#[tokio::test]
async fn test_readiness_probe_no_body() {
    let response = get(create_test_router(), "/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body.len(), 0);
}

#[tokio::test]
async fn test_health_endpoints_are_idempotent() {
    let app = create_test_router();

    for _ in 0..3 {
        let response = get(app.clone(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_health_response_roundtrip() {
    let json = r#"{
        "status": "unhealthy",
        "version": "0.1.0",
        "timestamp": 1234567890,
        "storage": {
            "backend": "postgres",
            "status": "unhealthy",
            "latency_ms": null
        }
    }"#;

    let health_response: HealthResponse = serde_json::from_str(json).unwrap();
    assert_eq!(health_response.status, "unhealthy");
    assert_eq!(health_response.storage.backend, "postgres");
    assert!(health_response.storage.latency_ms.is_none());

    let serialized = serde_json::to_string(&HealthResponse {
        storage: StorageHealth {
            latency_ms: Some(3),
            ..health_response.storage
        },
        ..health_response
    })
    .unwrap();
    assert!(serialized.contains("\"latency_ms\":3"));
}

#[tokio::test]
async fn test_concurrent_health_checks() {
    use tokio::task::JoinSet;

    let app = create_test_router();
    let mut set = JoinSet::new();

    for _ in 0..10 {
        let app = app.clone();
        set.spawn(async move { get(app, "/health").await.status() });
    }

    while let Some(result) = set.join_next().await {
        assert_eq!(result.unwrap(), StatusCode::OK);
    }
}
