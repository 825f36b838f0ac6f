pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analyses", post(handlers::handle_analyze))
        .route("/api/v1/rewrites", post(handlers::handle_rewrite))
        .route("/api/v1/summaries", post(handlers::handle_quick_summary))
        .with_state(state)
}
