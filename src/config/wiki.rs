//! Semantic MediaWiki connection configuration

use serde::{Deserialize, Serialize};

/// Environment variable consulted when no wiki password is configured
pub const WIKI_PASSWORD_ENV: &str = "SMW_PASSWORD";

/// Semantic MediaWiki API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Full URL of the wiki's `api.php`
    pub api_url: String,
    /// Bot or user name used for login
    pub username: String,
    /// Password (falls back to `SMW_PASSWORD`)
    #[serde(default)]
    pub password: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl WikiConfig {
    /// Password from config or environment, empty when neither is set
    pub fn resolved_password(&self) -> String {
        self.password
            .clone()
            .or_else(|| std::env::var(WIKI_PASSWORD_ENV).ok())
            .unwrap_or_default()
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost/w/api.php".to_string(),
            username: "Adapter".to_string(),
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
