//! API router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let api_routes = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        // Configuration surface
        .route("/catalog", get(handlers::catalog))
        // Run lifecycle
        .route("/run", post(handlers::start_run))
        .route("/run/stop", post(handlers::stop_run))
        .route("/run/reset", post(handlers::reset_run))
        // Snapshots
        .route("/run/log", get(handlers::get_log))
        .route("/run/report", get(handlers::get_report))
        // Live progress
        .route("/run/events", get(handlers::stream_events));

    let mut app = Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.with_state(state)
}
