pub mod constants;
pub mod types;
pub use constants::{DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS, URL};
pub use types::DbConfig;
