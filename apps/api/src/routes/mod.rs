pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::extraction::handlers::{handle_extract_pdf, MAX_REQUEST_BYTES};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Match API
        .route("/api/match", post(handlers::handle_match))
        .route("/api/analysis/:id", get(handlers::handle_get_analysis))
        .route("/api/history", get(handlers::handle_history))
        // Upload API
        .route(
            "/api/extract-pdf",
            post(handle_extract_pdf).layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES)),
        )
        .with_state(state)
}
