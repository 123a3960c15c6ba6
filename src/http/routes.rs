use super::handlers;
use super::state::AppState;
use super::ws;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Subscribers
        .route("/ws", get(ws::subscribe))
        // Producer ingest
        .route("/transcript", post(handlers::ingest_transcript))
        .route("/broadcast", post(handlers::relay_broadcast))
        // Session control
        .route("/start_recording", post(handlers::start_recording))
        .route("/stop_recording", post(handlers::stop_recording))
        .route("/clear", post(handlers::clear))
        .route("/update_prompt", post(handlers::update_prompt))
        .route("/status", get(handlers::get_status))
        // Display and admin clients are served from other origins
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
