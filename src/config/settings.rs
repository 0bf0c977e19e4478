use std::fmt;
use std::str::FromStr;

use crate::config::env::{env_opt, env_or};

/// Page size used by paginated listings when nothing is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Where todo and user records live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Credentials for the administrator created at startup
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("email", &self.email)
            .finish()
    }
}

/// HTTP API settings.
///
/// Read from `HOST`, `PORT`, `TODO_STORAGE`, `TODO_PAGE_SIZE` and the
/// `TODO_ADMIN_*` variables; every field can be overridden with a setter.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub page_size: usize,
    pub admin: Option<AdminCredentials>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        let admin = match (env_opt("TODO_ADMIN_USERNAME"), env_opt("TODO_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminCredentials {
                username,
                password,
                email: env_opt("TODO_ADMIN_EMAIL").unwrap_or_default(),
            }),
            _ => None,
        };

        Self {
            host: env_opt("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            storage: env_or("TODO_STORAGE", StorageBackend::Postgres),
            page_size: env_or("TODO_PAGE_SIZE", DEFAULT_PAGE_SIZE).max(1),
            admin,
        }
    }
}

impl ApiSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn set_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn set_storage(mut self, storage: StorageBackend) -> Self {
        self.storage = storage;
        self
    }

    /// Page size for paginated listings; zero is clamped to one
    pub fn set_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn set_admin(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.admin = Some(AdminCredentials {
            username: username.into(),
            password: password.into(),
            email: email.into(),
        });
        self
    }

    pub fn without_admin(mut self) -> Self {
        self.admin = None;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("postgres".parse::<StorageBackend>(), Ok(StorageBackend::Postgres));
        assert_eq!("PG".parse::<StorageBackend>(), Ok(StorageBackend::Postgres));
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_builder_overrides() {
        let settings = ApiSettings::new()
            .set_host("127.0.0.1")
            .set_port(8080)
            .set_storage(StorageBackend::Memory)
            .set_page_size(0)
            .set_admin("admin", "secret", "admin@example.com");

        assert_eq!(settings.bind_address(), "127.0.0.1:8080");
        assert_eq!(settings.storage, StorageBackend::Memory);
        assert_eq!(settings.page_size, 1);
        assert_eq!(
            settings.admin.as_ref().map(|a| a.username.as_str()),
            Some("admin")
        );
    }

    #[test]
    fn test_admin_password_not_debug_printed() {
        let settings = ApiSettings::new().set_admin("admin", "topsecret", "");
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("topsecret"));
    }
}
