use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/chat", post(handlers::submit_question))
        .route("/profiles/{profile_id}", get(handlers::get_depth_series))
        .with_state(state)
}
