//! Configuration for eln2smw

mod elabftw;
mod http;
mod logging;
mod wiki;

pub use elabftw::{ElabFtwConfig, FieldMapping, MappedField, ELABFTW_API_KEY_ENV};
pub use http::HttpConfig;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use wiki::{WikiConfig, WIKI_PASSWORD_ENV};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "eln2smw.toml";

/// General adapter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainConfig {
    /// Adapter version reported in every response
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
        }
    }
}

/// Main configuration for the adapter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub main: MainConfig,
    /// Target wiki
    #[serde(default)]
    pub wiki: WikiConfig,
    /// HTTP API server configuration
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// eLabFTW source
    #[serde(default)]
    pub elabftw: ElabFtwConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config = Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load config file '{}': {}", path.display(), e))?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.main.version.trim().is_empty() {
            errors.push("main.version must not be empty".to_string());
        }

        // Wiki validation
        if let Err(e) = Url::parse(&self.wiki.api_url) {
            errors.push(format!("wiki.api_url is not a valid URL: {}", e));
        }
        if self.wiki.username.trim().is_empty() {
            errors.push("wiki.username must not be empty".to_string());
        }
        if self.wiki.timeout_secs == 0 {
            errors.push("wiki.timeout_secs must be positive".to_string());
        }

        // HTTP config validation
        match self.http.listen_addr.rsplit_once(':') {
            Some((_, port_str)) => match port_str.parse::<u32>() {
                Ok(port) if port == 0 || port > 65535 => errors.push(format!(
                    "HTTP listen port must be between 1 and 65535, got {}",
                    port
                )),
                Ok(_) => {}
                Err(_) => errors.push(format!(
                    "HTTP listen address '{}' has no numeric port",
                    self.http.listen_addr
                )),
            },
            None => errors.push(format!(
                "HTTP listen address '{}' must be host:port",
                self.http.listen_addr
            )),
        }

        // eLabFTW validation
        if let Err(e) = Url::parse(&self.elabftw.api_url) {
            errors.push(format!("elabftw.api_url is not a valid URL: {}", e));
        }
        if self.elabftw.timeout_secs == 0 {
            errors.push("elabftw.timeout_secs must be positive".to_string());
        }
        for field in [
            MappedField::Person,
            MappedField::SpecimenDescription,
            MappedField::Date,
            MappedField::Experiment,
        ] {
            let candidates = self.elabftw.mapping.candidates(field);
            if candidates.iter().all(|c| c.trim().is_empty()) {
                errors.push(format!(
                    "elabftw.mapping.{} must list at least one parameter name",
                    field.as_str()
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}
