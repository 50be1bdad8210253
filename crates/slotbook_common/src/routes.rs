// --- File: crates/slotbook_common/src/routes.rs ---

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::handlers::{health_handler, index_handler, CommonState};

/// Creates a router with the shared routes: `/`, `/api` and `/api/health`.
///
/// Merge it at the root of the application router; the 404 fallback is
/// installed separately with `Router::fallback(fallback_handler)`.
pub fn routes(state: Arc<CommonState>) -> Router {
    let root = Router::new()
        .route("/", get(index_handler))
        .with_state(state.clone());
    api_routes(state).merge(root)
}

/// The shared routes without `/`, for when a static client is served at the root.
pub fn api_routes(state: Arc<CommonState>) -> Router {
    Router::new()
        .route("/api", get(index_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
