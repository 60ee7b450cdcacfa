//! HTTP API Route Definitions

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::auth::{require_api_key, ApiKeys};
use super::handlers::{self, AppState};

/// Create the API router with all routes
pub fn create_router(app_state: AppState, api_keys: ApiKeys) -> Router {
    let protected = Router::new()
        .route("/adapt", post(handlers::adapt))
        .layer(middleware::from_fn_with_state(api_keys, require_api_key));

    Router::new()
        // Open routes
        .route("/health", get(handlers::health))
        .route("/test", post(handlers::test))
        .merge(protected)
        .with_state(app_state)
}
