use std::time::Duration;

use crate::config::env::env_or;
use crate::datalayer::db_ops::constants::{self, DbConfig};

/*
Defaults for the todo database pool, each overridable from the environment:
- DATABASE_URL                 (constants::URL)
- DATABASE_MAX_CONNECTIONS     10
- DATABASE_MIN_CONNECTIONS     2
- DATABASE_ACQUIRE_TIMEOUT     30 seconds
- DATABASE_RUN_MIGRATIONS      true
Idle connections are dropped after 10 minutes and recycled after 30.
*/
impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| constants::URL.to_string()),
            max_connections: env_or(
                "DATABASE_MAX_CONNECTIONS",
                constants::DEFAULT_MAX_CONNECTIONS,
            ),
            min_connections: env_or(
                "DATABASE_MIN_CONNECTIONS",
                constants::DEFAULT_MIN_CONNECTIONS,
            ),
            connection_timeout: Duration::from_secs(env_or("DATABASE_ACQUIRE_TIMEOUT", 30)),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
            run_migrations: env_or("DATABASE_RUN_MIGRATIONS", true),
        }
    }
}

// Builder pattern for DbConfig
impl DbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    pub fn set_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn set_min_connections(mut self, min_connections: u32) -> Self {
        self.min_connections = min_connections;
        self
    }

    pub fn set_connection_timeout(mut self, connection_timeout: Duration) -> Self {
        self.connection_timeout = connection_timeout;
        self
    }

    pub fn set_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn set_max_lifetime(mut self, max_lifetime: Duration) -> Self {
        self.max_lifetime = max_lifetime;
        self
    }

    pub fn set_run_migrations(mut self, run_migrations: bool) -> Self {
        self.run_migrations = run_migrations;
        self
    }

    /// The URL with any password replaced, safe to log
    pub fn redacted_url(&self) -> String {
        match (self.database_url.find("://"), self.database_url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                let credentials = &self.database_url[scheme_end + 3..at];
                let user = credentials.split(':').next().unwrap_or_default();
                format!(
                    "{}{}:***{}",
                    &self.database_url[..scheme_end + 3],
                    user,
                    &self.database_url[at..]
                )
            }
            _ => self.database_url.clone(),
        }
    }
}
