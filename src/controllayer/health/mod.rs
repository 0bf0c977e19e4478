pub mod health;

pub use health::{HealthResponse, StorageHealth, health_check, liveness, readiness};
