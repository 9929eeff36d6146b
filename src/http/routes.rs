use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness, or media stream upgrade when the request asks for one
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Media stream
        .route("/ws", get(handlers::ws_handler))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
