use std::time::Duration;

/// Database configuration structure
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    /// Apply pending migrations from `migrations/` after connecting
    pub run_migrations: bool,
}
