use axum::{extract::Request, middleware::Next, response::Response};

/// Error logging middleware
/// Client errors are logged at warn level, server errors at error level
pub async fn error_handling_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<uuid::Uuid>()
        .map(|id| id.to_string());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            status = %status,
            method = %method,
            path = %path,
            request_id = ?request_id,
            "Request failed"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            status = %status,
            method = %method,
            path = %path,
            request_id = ?request_id,
            "Request rejected"
        );
    }

    response
}
