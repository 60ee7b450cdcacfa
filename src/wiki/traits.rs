//! Wiki API trait definitions
//!
//! Defines the operations the adapter needs from a Semantic MediaWiki.

use super::types::AskResponse;
use async_trait::async_trait;

/// Errors that can occur while talking to the wiki
#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Response body was not the JSON we expected
    #[error("Failed to parse response as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A field the protocol requires was absent
    #[error("{0} missing in response")]
    MissingField(&'static str),

    /// MediaWiki returned an `error` object
    #[error("API error {code}: {info}")]
    Api {
        /// MediaWiki error code
        code: String,
        /// Human-readable description
        info: String,
    },

    /// Login was answered with something other than `Success`
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Edit was answered with something other than `Success`
    #[error("Failed to edit page '{title}': {response}")]
    EditRejected {
        /// Page title
        title: String,
        /// Raw response body
        response: String,
    },

    /// A page title that should end in a sequence number did not
    #[error("Page title '{0}' does not end with a number")]
    UnexpectedTitle(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for wiki operations
pub type WikiResult<T> = Result<T, WikiError>;

/// Operations the adapter performs against a Semantic MediaWiki
///
/// Implementations must already be authenticated.
#[async_trait]
pub trait WikiApi: Send + Sync {
    /// Run an SMW `#ask` query (conditions and printouts joined by `|`)
    async fn ask(&self, query: &str) -> WikiResult<AskResponse>;

    /// Create or replace a page with the given wikitext
    async fn edit(&self, title: &str, text: &str) -> WikiResult<()>;
}
