//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/process-document", post(handlers::process_document))
        .route("/api/documents", get(handlers::list_documents))
        // Admin views
        .route("/api/clients", get(handlers::list_clients))
        .route("/api/queue", get(handlers::list_queue))
        .route("/api/stats", get(handlers::dashboard_stats))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
