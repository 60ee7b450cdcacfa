//! API key check for the adapt endpoint
//!
//! ELN integrations send one of the keys from `http.api_keys` in the
//! `Authorization` header, either bare or as `Bearer <key>`. Without
//! configured keys every request is let through.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use super::types::ErrorResponse;
use crate::config::HttpConfig;

/// Keys accepted from ELN clients
#[derive(Clone, Default)]
pub struct ApiKeys {
    keys: Arc<HashSet<String>>,
}

impl ApiKeys {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: Arc::new(
                keys.into_iter()
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect(),
            ),
        }
    }

    pub fn from_config(config: &HttpConfig) -> Self {
        Self::new(config.api_keys.iter().cloned())
    }

    /// No keys configured
    pub fn is_open(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn accepts(&self, key: &str) -> bool {
        self.is_open() || self.keys.contains(key)
    }
}

/// Key from the `Authorization` header, with an optional `Bearer ` prefix removed
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let key = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!key.is_empty()).then_some(key)
}

/// Reject requests without an accepted key
pub async fn require_api_key(
    State(keys): State<ApiKeys>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if keys.is_open() {
        return next.run(request).await;
    }

    match presented_key(request.headers()) {
        Some(key) if keys.accepts(key) => next.run(request).await,
        presented => {
            let path = request.uri().path().to_string();
            warn!(
                "Rejected {} request: {}",
                path,
                if presented.is_some() { "unknown API key" } else { "no API key" }
            );
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::unauthorized(&path)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );
        headers
    }

    #[test]
    fn without_keys_everything_is_accepted() {
        let keys = ApiKeys::new(Vec::new());
        assert!(keys.is_open());
        assert!(keys.accepts("anything"));
    }

    #[test]
    fn blank_configured_keys_are_ignored() {
        let keys = ApiKeys::from_config(&HttpConfig {
            api_keys: vec!["  ".to_string(), " eln-secret ".to_string()],
            ..HttpConfig::default()
        });
        assert!(!keys.is_open());
        assert!(keys.accepts("eln-secret"));
        assert!(!keys.accepts(""));
        assert!(!keys.accepts("wrong"));
    }

    #[test]
    fn key_is_read_bare_or_as_bearer() {
        assert_eq!(presented_key(&headers("eln-secret")), Some("eln-secret"));
        assert_eq!(presented_key(&headers("Bearer eln-secret ")), Some("eln-secret"));
        assert_eq!(presented_key(&headers("Bearer ")), None);
        assert_eq!(presented_key(&HeaderMap::new()), None);
    }
}
