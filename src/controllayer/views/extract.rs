use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::request::Parts,
    response::Response,
};
use serde_json::Value;
use tracing::warn;

use crate::errors::ServiceError;
use crate::handlers::fallback::not_found_response;

/// A JSON request body, kept untyped so the serializers can report
/// per-field errors instead of a single deserialization failure.
///
/// A missing or wrong `Content-Type` is rejected with 415, any other body
/// problem with 400.
#[derive(Debug, Clone)]
pub struct ApiPayload(pub Value);

#[async_trait]
impl<S> FromRequest<S> for ApiPayload
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiPayload(value)),
            Err(JsonRejection::MissingJsonContentType(rejection)) => {
                Err(ServiceError::UnsupportedMediaType(rejection.body_text()))
            }
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "Malformed JSON body");
                Err(ServiceError::InvalidInput(rejection.body_text()))
            }
        }
    }
}

/// Numeric primary key taken from the route's single path parameter.
/// Anything that is not an integer does not match a detail route and gets 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ObjectId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found_response())?;
        raw.parse::<i64>().map(ObjectId).map_err(|_| not_found_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_valid_json_accepted() {
        let ApiPayload(value) =
            ApiPayload::from_request(request(Some("application/json"), r#"{"title":"a"}"#), &())
                .await
                .unwrap();
        assert_eq!(value["title"], "a");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_unsupported() {
        let result = ApiPayload::from_request(request(None, r#"{"title":"a"}"#), &()).await;
        assert!(matches!(result, Err(ServiceError::UnsupportedMediaType(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_input() {
        let result = ApiPayload::from_request(request(Some("application/json"), "{oops"), &()).await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }
}
