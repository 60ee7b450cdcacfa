//! eLabFTW REST client

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ElabFtwConfig;

/// Errors that can occur while fetching from eLabFTW
#[derive(Debug, Error)]
pub enum ElabError {
    #[error("eLabFTW request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("eLabFTW API returned http status {code} - {message}")]
    Api { code: u16, message: String },
    #[error("eLabFTW configuration error: {0}")]
    Config(String),
}

/// The parts of an eLabFTW experiment the plugin uses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Experiment {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Experiment body as HTML
    #[serde(default)]
    pub body: Option<String>,
    /// Creation timestamp, e.g. `2024-06-13 15:04:03`
    #[serde(default)]
    pub created_at: String,
}

/// Error body returned by the eLabFTW API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<u16>,
    message: Option<String>,
}

/// Client for the eLabFTW v2 API
#[derive(Debug, Clone)]
pub struct ElabClient {
    client: Client,
    api_url: Url,
    api_key: String,
}

impl ElabClient {
    pub fn new(config: &ElabFtwConfig) -> Result<Self, ElabError> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| ElabError::Config(format!("Invalid API URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            client,
            api_url,
            api_key: config.resolved_api_key(),
        })
    }

    /// URL of a single experiment
    fn experiment_url(&self, id: &str) -> Result<Url, ElabError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ElabError::Config(format!("API URL {} cannot be a base", self.api_url)))?
            .pop_if_empty()
            .push("experiments")
            .push(id);
        Ok(url)
    }

    /// Fetch one experiment by id
    pub async fn experiment(&self, id: &str) -> Result<Experiment, ElabError> {
        let url = self.experiment_url(id)?;
        debug!("Fetching eLabFTW experiment {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<ApiErrorBody>(&body).ok();
            let code = parsed
                .as_ref()
                .and_then(|b| b.code)
                .unwrap_or_else(|| status.as_u16());
            let message = parsed
                .and_then(|b| b.message)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();
            return Err(ElabError::Api { code, message });
        }

        Ok(response.json::<Experiment>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> ElabClient {
        ElabClient::new(&ElabFtwConfig {
            api_url: api_url.to_string(),
            ..ElabFtwConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn experiment_url_appends_segments() {
        let c = client("https://elab.example.org/api/v2");
        assert_eq!(
            c.experiment_url("42").unwrap().as_str(),
            "https://elab.example.org/api/v2/experiments/42"
        );
    }

    #[test]
    fn experiment_url_handles_trailing_slash_and_escapes_id() {
        let c = client("https://elab.example.org/api/v2/");
        assert_eq!(
            c.experiment_url("4/2").unwrap().as_str(),
            "https://elab.example.org/api/v2/experiments/4%2F2"
        );
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let err = ElabClient::new(&ElabFtwConfig {
            api_url: "elab".to_string(),
            ..ElabFtwConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ElabError::Config(_)));
    }

    #[test]
    fn api_error_message_matches_response_text() {
        let err = ElabError::Api {
            code: 404,
            message: "Nothing to show with this id".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "eLabFTW API returned http status 404 - Nothing to show with this id"
        );
    }

    #[test]
    fn experiment_tolerates_null_body() {
        let exp: Experiment =
            serde_json::from_str(r#"{"id": 3, "title": "T", "body": null, "created_at": "2024-06-13 15:04:03"}"#)
                .unwrap();
        assert_eq!(exp.id, 3);
        assert!(exp.body.is_none());
    }
}
