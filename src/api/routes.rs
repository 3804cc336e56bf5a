//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{create_worker, delete_worker, get_worker, health, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(health))
        // Worker endpoints
        .route("/workers", post(create_worker))
        .route("/workers/:name", get(get_worker).delete(delete_worker))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
