pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

/// Upper bound on an uploaded resume plus form fields.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        .route("/api/v1/evaluations", post(handlers::handle_evaluate))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
