pub mod errors;

pub use errors::{FieldErrors, ServiceError, ServiceResult, create_error_response};
