use todo_views_backend::{
    config::{ApiSettings, StorageBackend},
    controllayer::users::users_handler::bootstrap_admin,
    logging::{init_telemetry, shutdown_telemetry},
    routes::create_router,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables first
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry (tracing, metrics, and logging)
    init_telemetry(None)?;

    let settings = ApiSettings::new();
    tracing::info!(
        storage = %settings.storage,
        page_size = settings.page_size,
        "Starting Todo Views Backend"
    );

    #[cfg(feature = "sqlx")]
    let mut db = None;

    let state = match settings.storage {
        StorageBackend::Memory => AppState::in_memory(settings.clone()),
        #[cfg(feature = "sqlx")]
        StorageBackend::Postgres => {
            let manager = todo_views_backend::datalayer::initialize_database().await?;
            tracing::info!("Database initialized successfully");
            let state = AppState::postgres(&manager, settings.clone());
            db = Some(manager);
            state
        }
        #[cfg(not(feature = "sqlx"))]
        StorageBackend::Postgres => {
            return Err(todo_views_backend::errors::ServiceError::ConfigurationError(
                "postgres storage requires the `sqlx` feature".to_string(),
            )
            .into());
        }
    };

    if let Some(admin) = bootstrap_admin(&state).await? {
        tracing::info!(user_id = admin.id, username = %admin.username, "Admin user created");
    }

    let app = create_router(state);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        address = %addr,
        "Server listening and ready to accept connections"
    );

    tracing::info!(
        endpoints = ?vec![
            "/api/function-views/todos",
            "/api/class-views/todos",
            "/api/mixins/todos",
            "/api/generics/todos",
            "/api/viewset/todos",
            "/api/users",
            "/health",
        ],
        "Available API endpoints"
    );

    // Start the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    #[cfg(feature = "sqlx")]
    if let Some(manager) = db {
        manager.shutdown().await;
    }

    shutdown_telemetry();

    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("Shutdown signal received, cleaning up...");
}
