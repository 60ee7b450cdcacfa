//! ELN source plugins
//!
//! Each plugin knows how to fetch one record from its ELN and turn it into
//! Specimen / Protocol / Record pages through the [`Adapter`]. Plugins are
//! selected by name, case-insensitively:
//!
//! | name      | source                          |
//! |-----------|---------------------------------|
//! | `elabftw` | eLabFTW experiments (REST v2)   |

pub mod elabftw;

use async_trait::async_trait;
use tracing::info;

use crate::adapter::{AdaptError, Adapter};
use crate::config::Config;

pub use elabftw::ElabFtwPlugin;

/// Names accepted by [`create_plugin`]
pub const AVAILABLE_PLUGINS: &[&str] = &["elabftw"];

/// Source-specific extraction and mapping
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Display name, also written as the protocol origin
    fn name(&self) -> &str;

    /// Fetch record `id` from the source and create its pages.
    ///
    /// Problems with the source record itself are reported as adapter
    /// messages; only failures that leave the wiki unusable are returned.
    async fn run(&self, id: &str, adapter: &mut Adapter) -> Result<(), AdaptError>;
}

/// Create the plugin registered under `name`
pub fn create_plugin(name: &str, config: &Config) -> Result<Box<dyn Plugin>, AdaptError> {
    match name.trim().to_lowercase().as_str() {
        "elabftw" => {
            info!("Creating eLabFTW plugin: api_url={}", config.elabftw.api_url);
            Ok(Box::new(ElabFtwPlugin::new(config.elabftw.clone())))
        }
        _ => Err(AdaptError::UnknownSource(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_names_are_case_insensitive() {
        let config = Config::default();
        for name in ["elabftw", "eLabFTW", " ELABFTW "] {
            let plugin = create_plugin(name, &config).unwrap();
            assert_eq!(plugin.name(), "eLabFTW");
        }
    }

    #[test]
    fn unknown_plugin_is_rejected() {
        let err = create_plugin("labguru", &Config::default()).err().unwrap();
        assert!(matches!(err, AdaptError::UnknownSource(ref n) if n == "labguru"));
        assert_eq!(err.to_string(), "Unknown ELN source 'labguru'");
    }

    #[test]
    fn every_listed_plugin_can_be_created() {
        let config = Config::default();
        for name in AVAILABLE_PLUGINS {
            assert!(create_plugin(name, &config).is_ok(), "{} should be available", name);
        }
    }
}
