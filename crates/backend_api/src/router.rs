use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{self, AppState};

/// Create the main application router with all API endpoints
pub fn create_router(state: AppState) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Cost management endpoints
        .route("/api/add", post(handlers::add_cost))
        .route("/api/report", get(handlers::get_monthly_report))
        .route("/api/users/:id", get(handlers::get_user_details))
        // Method mismatches on this path must 404, not 405
        .route(
            "/api/about",
            get(handlers::get_about).fallback(handlers::route_not_found),
        )
        // Unknown paths
        .fallback(handlers::route_not_found)
        // Add shared state
        .with_state(state)
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
