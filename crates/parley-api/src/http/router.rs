//! Axum router configuration with middleware.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the router: `POST /callback`, `GET /health`, request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/callback", post(handlers::callback::callback))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
