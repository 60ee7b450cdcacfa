//! HTTP API Request Handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{debug, error};

use crate::adapter::{adapt as run_adapt, AdaptError};
use crate::config::Config;

use super::types::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Connectivity test used by ELN integrations
pub async fn test() -> impl IntoResponse {
    Json(TestResponse { success: true })
}

/// Adapt one ELN record into wiki pages
pub async fn adapt(
    State(state): State<AppState>,
    Json(request): Json<AdaptRequest>,
) -> impl IntoResponse {
    debug!("HTTP adapt request: eln={}, id={}", request.eln, request.id);

    if request.id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("id must not be empty")),
        )
            .into_response();
    }

    match run_adapt(&state.config, &request.eln, request.id.trim()).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e @ AdaptError::UnknownSource(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
            .into_response(),
        Err(AdaptError::Wiki(e)) => {
            error!("Wiki unavailable: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::bad_gateway(format!("Wiki unavailable: {}", e))),
            )
                .into_response()
        }
    }
}
