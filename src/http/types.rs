//! HTTP API Request/Response Types
//!
//! JSON-serializable types for the HTTP API. The adapt response itself is
//! [`crate::types::AdaptResponse`].

use serde::{Deserialize, Deserializer, Serialize};

/// Adapt request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptRequest {
    /// Plugin name, e.g. "eLabFTW"
    pub eln: String,
    /// Record identifier inside the ELN (string or number)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Unsigned(n) => n.to_string(),
        Id::Signed(n) => n.to_string(),
    })
}

/// Response of the connectivity test endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResponse {
    pub success: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Whether the service is healthy
    pub healthy: bool,
    /// Service version
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new("BAD_GATEWAY", message)
    }

    pub fn unauthorized(path: &str) -> Self {
        Self::new(
            "UNAUTHORIZED",
            format!("{} requires a valid API key in the Authorization header", path),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapt_request_accepts_numeric_and_string_ids() {
        let req: AdaptRequest = serde_json::from_str(r#"{"eln": "eLabFTW", "id": 42}"#).unwrap();
        assert_eq!(req.id, "42");

        let req: AdaptRequest = serde_json::from_str(r#"{"eln": "eLabFTW", "id": "42"}"#).unwrap();
        assert_eq!(req.id, "42");
    }

    #[test]
    fn adapt_request_requires_both_fields() {
        assert!(serde_json::from_str::<AdaptRequest>(r#"{"eln": "eLabFTW"}"#).is_err());
        assert!(serde_json::from_str::<AdaptRequest>(r#"{"id": 1}"#).is_err());
        assert!(serde_json::from_str::<AdaptRequest>(r#"{"eln": "x", "id": [1]}"#).is_err());
    }
}
