use std::sync::Arc;

use crate::evaluation::orchestrator::Evaluator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-evaluation data; every request runs against its own inputs.
#[derive(Clone)]
pub struct AppState {
    pub evaluator: Arc<Evaluator>,
}
