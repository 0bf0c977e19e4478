use axum::{Router, middleware, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    class_views, fallback, function_views, generic_views, health, mixin_views, users, viewset,
};
use crate::middleware::{
    error::error_handling_middleware, metrics::metrics_middleware,
    request_id::request_id_middleware,
};
use crate::state::AppState;

/// Create the main application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Health routes
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Todo routes, one router per view style
    let todo_routes = Router::new()
        .merge(function_views::routes())
        .merge(class_views::routes())
        .merge(mixin_views::routes())
        .merge(generic_views::routes(&state))
        .merge(viewset::routes());

    // Main router combining all routes
    Router::new()
        .merge(health_routes)
        .merge(todo_routes)
        .merge(users::routes(&state))
        .fallback(fallback::not_found)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(error_handling_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
