use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Realm advertised in `WWW-Authenticate` challenges
pub const AUTH_REALM: &str = "api";

/// Field name -> validation messages, in the shape serializers emit them
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Main error type for the todo service
#[derive(Debug)]
pub enum ServiceError {
    // Authentication Errors
    MissingCredentials,
    InvalidCredentials,
    InactiveUser,

    // Todo Errors
    TodoNotFound(i64),

    // User Errors
    UserAlreadyExists(String),

    // Pagination Errors
    InvalidPage(String),

    // Request Errors
    ValidationError(FieldErrors),
    InvalidInput(String),
    UnsupportedMediaType(String),
    MethodNotAllowed(String),

    // Database Errors
    DatabaseError(String),
    DatabaseConnectionError,

    // Internal Errors
    InternalServerError(String),
    ConfigurationError(String),
}

/// Error response structure sent to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::MissingCredentials => {
                write!(f, "Authentication credentials were not provided.")
            }
            ServiceError::InvalidCredentials => write!(f, "Invalid username/password."),
            ServiceError::InactiveUser => write!(f, "User inactive or deleted."),

            ServiceError::TodoNotFound(id) => write!(f, "Todo not found: {}", id),

            ServiceError::UserAlreadyExists(username) => {
                write!(f, "User already exists: {}", username)
            }

            ServiceError::InvalidPage(msg) => write!(f, "{}", msg),

            ServiceError::ValidationError(fields) => {
                let summary = fields
                    .iter()
                    .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
                    .collect::<Vec<_>>()
                    .join("; ");
                write!(f, "Validation error: {}", summary)
            }
            ServiceError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ServiceError::UnsupportedMediaType(msg) => {
                write!(f, "Unsupported media type: {}", msg)
            }
            ServiceError::MethodNotAllowed(method) => {
                write!(f, "Method \"{}\" not allowed.", method)
            }

            ServiceError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ServiceError::DatabaseConnectionError => write!(f, "Failed to connect to database"),

            ServiceError::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
            ServiceError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    /// Build a validation error for a single field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        ServiceError::ValidationError(fields)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            ServiceError::MissingCredentials
            | ServiceError::InvalidCredentials
            | ServiceError::InactiveUser => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            ServiceError::TodoNotFound(_) | ServiceError::InvalidPage(_) => StatusCode::NOT_FOUND,

            // 405 Method Not Allowed
            ServiceError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,

            // 409 Conflict
            ServiceError::UserAlreadyExists(_) => StatusCode::CONFLICT,

            // 400 Bad Request
            ServiceError::ValidationError(_) | ServiceError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }

            // 415 Unsupported Media Type
            ServiceError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            // 503 Service Unavailable
            ServiceError::DatabaseConnectionError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            ServiceError::DatabaseError(_)
            | ServiceError::InternalServerError(_)
            | ServiceError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::MissingCredentials => "NOT_AUTHENTICATED",
            ServiceError::InvalidCredentials => "AUTHENTICATION_FAILED",
            ServiceError::InactiveUser => "USER_INACTIVE",

            ServiceError::TodoNotFound(_) => "TODO_NOT_FOUND",

            ServiceError::UserAlreadyExists(_) => "USER_ALREADY_EXISTS",

            ServiceError::InvalidPage(_) => "INVALID_PAGE",

            ServiceError::ValidationError(_) => "VALIDATION_ERROR",
            ServiceError::InvalidInput(_) => "INVALID_INPUT",
            ServiceError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            ServiceError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",

            ServiceError::DatabaseError(_) => "DATABASE_ERROR",
            ServiceError::DatabaseConnectionError => "DATABASE_CONNECTION_ERROR",

            ServiceError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ServiceError::ConfigurationError(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Convert error to JSON details for response
    pub fn to_details(&self) -> Option<serde_json::Value> {
        match self {
            ServiceError::ValidationError(fields) => Some(serde_json::json!(fields)),
            ServiceError::TodoNotFound(id) => Some(serde_json::json!({ "id": id })),
            _ => None,
        }
    }

    fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            ServiceError::MissingCredentials
                | ServiceError::InvalidCredentials
                | ServiceError::InactiveUser
        )
    }
}

/// Implement IntoResponse for Axum integration
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let challenge = self.is_authentication_error();
        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                details: self.to_details(),
            },
        };

        let mut response = (status, Json(error_response)).into_response();
        if challenge {
            if let Ok(value) = HeaderValue::from_str(&format!("Basic realm=\"{}\"", AUTH_REALM)) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}

/// Build an error envelope for failures that have no ServiceError variant
pub fn create_error_response(
    status: StatusCode,
    code: &str,
    message: &str,
    request_id: Option<String>,
) -> Response {
    let error_response = ErrorResponse {
        error: ErrorDetail {
            code: code.to_string(),
            message: message.to_string(),
            details: request_id.map(|id| serde_json::json!({ "request_id": id })),
        },
    };

    (status, Json(error_response)).into_response()
}

/// Conversion from sqlx errors
#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ServiceError::DatabaseConnectionError
            }
            _ => ServiceError::DatabaseError(err.to_string()),
        }
    }
}

/// Conversion from validation errors
impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errors) in err.field_errors() {
            let messages = fields.entry(field.to_string()).or_default();
            for error in errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                messages.push(message);
            }
        }
        ServiceError::ValidationError(fields)
    }
}

/// Type alias for Results using ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;
