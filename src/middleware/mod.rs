pub mod auth;
pub mod error;
pub mod metrics;
pub mod request_id;
