//! HTTP client for the MediaWiki action API
//!
//! Keeps one cookie-holding session per client so the login from
//! [`MediaWikiClient::connect`] authorizes the following ask and edit calls.

use super::traits::{WikiApi, WikiError, WikiResult};
use super::types::AskResponse;
use crate::config::WikiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Authenticated MediaWiki API session
#[derive(Debug, Clone)]
pub struct MediaWikiClient {
    client: Client,
    api_url: Url,
}

impl MediaWikiClient {
    /// Create an unauthenticated client for the configured `api.php`
    pub fn new(config: &WikiConfig) -> WikiResult<Self> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| WikiError::Config(format!("Invalid wiki API URL: {}", e)))?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("eln2smw/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, api_url })
    }

    /// Create a client and log in with the configured credentials
    pub async fn connect(config: &WikiConfig) -> WikiResult<Self> {
        let client = Self::new(config)?;
        client
            .login(&config.username, &config.resolved_password())
            .await?;
        Ok(client)
    }

    /// Log in using a freshly requested login token
    pub async fn login(&self, username: &str, password: &str) -> WikiResult<()> {
        let tokens = self
            .get_json(&[
                ("action", "query"),
                ("meta", "tokens"),
                ("type", "login"),
                ("format", "json"),
            ])
            .await?;
        let login_token = tokens
            .pointer("/query/tokens/logintoken")
            .and_then(Value::as_str)
            .ok_or(WikiError::MissingField("Login token"))?
            .to_string();

        let result = self
            .post_json(&[
                ("action", "login"),
                ("lgname", username),
                ("lgpassword", password),
                ("lgtoken", login_token.as_str()),
                ("format", "json"),
            ])
            .await?;

        let outcome = result
            .pointer("/login/result")
            .and_then(Value::as_str)
            .ok_or(WikiError::MissingField("Login result"))?;

        if outcome == "Success" {
            info!("Logged in to {} as {}", self.api_url, username);
            Ok(())
        } else {
            let reason = result
                .pointer("/login/reason")
                .map(|r| match r {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!("Login to {} failed: {}", self.api_url, reason);
            Err(WikiError::LoginFailed(reason))
        }
    }

    /// Request a CSRF token for editing
    async fn csrf_token(&self) -> WikiResult<String> {
        let tokens = self
            .get_json(&[("action", "query"), ("meta", "tokens"), ("format", "json")])
            .await?;
        tokens
            .pointer("/query/tokens/csrftoken")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(WikiError::MissingField("CSRF token"))
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> WikiResult<Value> {
        let response = self
            .client
            .get(self.api_url.clone())
            .query(params)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn post_json(&self, form: &[(&str, &str)]) -> WikiResult<Value> {
        let response = self
            .client
            .post(self.api_url.clone())
            .form(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Check the status and decode the body, surfacing MediaWiki `error` objects
    async fn parse(response: reqwest::Response) -> WikiResult<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(WikiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;

        if let Some(error) = value.get("error") {
            let field = |name: &str| {
                error
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            return Err(WikiError::Api {
                code: field("code"),
                info: field("info"),
            });
        }

        Ok(value)
    }
}

#[async_trait]
impl WikiApi for MediaWikiClient {
    async fn ask(&self, query: &str) -> WikiResult<AskResponse> {
        debug!("SMW ask: {}", query);
        let value = self
            .get_json(&[("action", "ask"), ("query", query), ("format", "json")])
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn edit(&self, title: &str, text: &str) -> WikiResult<()> {
        let token = self.csrf_token().await?;

        let result = self
            .post_json(&[
                ("action", "edit"),
                ("title", title),
                ("text", text),
                ("token", token.as_str()),
                ("format", "json"),
            ])
            .await?;

        match result.pointer("/edit/result").and_then(Value::as_str) {
            Some("Success") => {
                debug!("Page '{}' edited successfully", title);
                Ok(())
            }
            _ => Err(WikiError::EditRejected {
                title: title.to_string(),
                response: result.to_string(),
            }),
        }
    }
}
