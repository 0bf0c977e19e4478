use crate::datalayer::db_ops::constants::DbConfig;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Database connection manager owning the PostgreSQL pool
#[derive(Clone)]
pub struct DbManager {
    pool: Arc<PgPool>,
}

impl DbManager {
    /// Creates a new database manager and its connection pool
    #[instrument(skip_all, fields(service = "DbManager"))]
    pub async fn new(config: DbConfig) -> Result<Self, sqlx::Error> {
        info!(
            database_url = %config.redacted_url(),
            max_connections = config.max_connections,
            "Initializing database connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connection_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                e
            })?;

        info!("Database connection pool created successfully");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Creates a database manager with default configuration
    pub async fn with_defaults() -> Result<Self, sqlx::Error> {
        Self::new(DbConfig::default()).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get an Arc clone of the pool for sharing across stores
    pub fn pool_arc(&self) -> Arc<PgPool> {
        Arc::clone(&self.pool)
    }

    /// Apply the schema migrations embedded from `migrations/`
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&*self.pool)
            .await
            .map_err(|e| {
                error!("Failed to run migrations: {}", e);
                sqlx::Error::from(e)
            })?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Health check - verifies database connectivity
    pub async fn health_check(&self) -> Result<DatabaseHealth, sqlx::Error> {
        let start = std::time::Instant::now();

        sqlx::query("SELECT 1").execute(&*self.pool).await?;

        let latency = start.elapsed();

        Ok(DatabaseHealth {
            is_healthy: true,
            latency_ms: latency.as_millis() as u64,
            pool_size: self.pool.size(),
            idle_connections: self.pool.num_idle(),
        })
    }

    /// Graceful shutdown - closes all connections in the pool
    pub async fn shutdown(&self) {
        info!("Shutting down database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }

    /// Test database connection and log pool statistics
    pub async fn test_connection(&self) -> Result<(), sqlx::Error> {
        let health = self.health_check().await?;

        info!(
            pool_size = health.pool_size,
            idle = health.idle_connections,
            latency_ms = health.latency_ms,
            "Database connection test successful"
        );

        Ok(())
    }
}

/// Database health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub is_healthy: bool,
    pub latency_ms: u64,
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// Initialize database connection at application startup
pub async fn initialize_database() -> Result<DbManager, sqlx::Error> {
    initialize_database_with_config(DbConfig::default()).await
}

/// Initialize database with custom configuration
pub async fn initialize_database_with_config(config: DbConfig) -> Result<DbManager, sqlx::Error> {
    info!("=== Database Initialization Started ===");

    let run_migrations = config.run_migrations;
    let db_manager = DbManager::new(config).await?;
    db_manager.test_connection().await?;

    if run_migrations {
        db_manager.run_migrations().await?;
    }

    info!("=== Database Initialization Completed ===");

    Ok(db_manager)
}
