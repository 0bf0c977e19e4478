use axum::{
    http::{Method, StatusCode, Uri},
    response::Response,
};
use tracing::debug;

use crate::errors::{ServiceError, create_error_response};

/// Envelope returned for paths no route matches
pub fn not_found_response() -> Response {
    create_error_response(StatusCode::NOT_FOUND, "NOT_FOUND", "Not found.", None)
}

/// Router fallback for unknown paths
pub async fn not_found(uri: Uri) -> Response {
    debug!(path = %uri.path(), "No route matched");
    not_found_response()
}

/// Method fallback for routes that exist but do not accept the method
pub async fn method_not_allowed(method: Method) -> ServiceError {
    ServiceError::MethodNotAllowed(method.to_string())
}
