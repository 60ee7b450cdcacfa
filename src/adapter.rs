//! Page creation workflow
//!
//! The [`Adapter`] lives for exactly one request. Plugins hand it schema
//! values, it allocates sequential page titles through SMW ask queries,
//! writes the pages and collects everything that goes into the response.

use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::config::Config;
use crate::plugins::{create_plugin, Plugin};
use crate::types::{AdaptResponse, Message, MessageType, PageData};
use crate::wiki::{MediaWikiClient, WikiApi, WikiError};

/// Errors that abort an adapt call
#[derive(Debug, thiserror::Error)]
pub enum AdaptError {
    /// No plugin is registered under the requested name
    #[error("Unknown ELN source '{0}'")]
    UnknownSource(String),

    /// Wiki login or query failed
    #[error(transparent)]
    Wiki(#[from] WikiError),
}

/// Per-request page writer and response collector
pub struct Adapter {
    wiki: Arc<dyn WikiApi>,
    version: String,
    pages: IndexMap<String, String>,
    messages: Vec<Message>,
    started: Instant,
}

impl Adapter {
    pub fn new(wiki: Arc<dyn WikiApi>, version: impl Into<String>) -> Self {
        Self {
            wiki,
            version: version.into(),
            pages: IndexMap::new(),
            messages: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Run a plugin for one record and build the response.
    ///
    /// A plugin failure after selection still yields a response; the error
    /// becomes an `error` message next to whatever pages were created.
    pub async fn run(mut self, plugin: &dyn Plugin, id: &str) -> AdaptResponse {
        if let Err(e) = plugin.run(id, &mut self).await {
            error!("Plugin {} failed for id {}: {}", plugin.name(), id, e);
            self.add_message(MessageType::Error, e.to_string());
        }
        self.log_runtime();
        self.into_response()
    }

    /// Create a wiki page and return its title.
    ///
    /// The title is returned even if the edit was rejected, since later pages
    /// reference it; the failure is logged and reported as a message.
    pub async fn create_page(&mut self, page: PageData) -> Result<String, AdaptError> {
        let index = match page.ask_condition() {
            Some(condition) => self.next_page_index(&condition).await?,
            None => 0,
        };
        let title = page.title(index);
        let text = page.wikitext();

        info!(
            "Create SMW page of category {} with title {}",
            page.category(),
            title
        );

        match self.wiki.edit(&title, &text).await {
            Ok(()) => {
                info!("Page {} was created", title);
                self.pages.insert(title.clone(), text);
            }
            Err(e) => {
                error!("Page {} was not created: {}", title, e);
                self.add_message(
                    MessageType::Error,
                    format!("Page {} was not created: {}", title, e),
                );
            }
        }

        Ok(title)
    }

    /// Next free sequence number among pages matching an ask condition
    pub async fn next_page_index(&self, condition: &str) -> Result<u64, WikiError> {
        let response = self
            .wiki
            .ask(&format!("{}|limit=1|order=desc", condition))
            .await?;

        if response.is_empty() {
            return Ok(1);
        }

        let name = response
            .first_fulltext()
            .ok_or(WikiError::MissingField("fulltext"))?;
        trailing_number(name)
            .map(|n| n + 1)
            .ok_or_else(|| WikiError::UnexpectedTitle(name.to_string()))
    }

    pub fn add_message(&mut self, kind: MessageType, text: impl Into<String>) {
        self.messages.push(Message::new(kind, text));
    }

    /// Log milliseconds elapsed since the adapter was created
    pub fn log_runtime(&self) {
        info!("Runtime {} ms", self.started.elapsed().as_millis());
    }

    pub fn pages(&self) -> &IndexMap<String, String> {
        &self.pages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_response(self) -> AdaptResponse {
        AdaptResponse {
            version: self.version,
            smw_pages: self.pages,
            messages: self.messages,
        }
    }
}

/// Resolve the plugin, log in to the wiki and adapt one record.
pub async fn adapt(config: &Config, eln: &str, id: &str) -> Result<AdaptResponse, AdaptError> {
    info!("Call for plugin {} with page id {}", eln, id);

    let plugin = create_plugin(eln, config)?;
    let wiki = MediaWikiClient::connect(&config.wiki).await?;

    let adapter = Adapter::new(Arc::new(wiki), config.main.version.clone());
    Ok(adapter.run(plugin.as_ref(), id).await)
}

/// Decimal digits at the end of a page title
fn trailing_number(title: &str) -> Option<u64> {
    let stem = title.trim_end_matches(|c: char| c.is_ascii_digit());
    title[stem.len()..].parse().ok()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::wiki::{AskResponse, WikiResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory wiki that answers ask queries from its own page list
    #[derive(Default)]
    pub struct FakeWiki {
        pub pages: Mutex<Vec<(String, String)>>,
        pub asks: Mutex<Vec<String>>,
        pub reject_edits: bool,
        /// Asks containing this text fail with an API error
        pub failing_ask: Option<&'static str>,
    }

    impl FakeWiki {
        pub fn with_pages(titles: &[&str]) -> Self {
            let wiki = Self::default();
            {
                let mut pages = wiki.pages.lock().unwrap();
                for title in titles {
                    pages.push((title.to_string(), String::new()));
                }
            }
            wiki
        }
    }

    #[async_trait]
    impl WikiApi for FakeWiki {
        async fn ask(&self, query: &str) -> WikiResult<AskResponse> {
            self.asks.lock().unwrap().push(query.to_string());
            if self.failing_ask.is_some_and(|needle| query.contains(needle)) {
                return Err(WikiError::Api {
                    code: "internal_api_error_DBQueryError".to_string(),
                    info: "A database query error has occurred.".to_string(),
                });
            }

            let prefix = if query.starts_with("[[Category:Specimen]]") {
                "S".to_string()
            } else if let Some(rest) = query.strip_prefix("[[Category:Protocol]][[ProtocolType::") {
                let protocol_type = rest.split("]]").next().unwrap_or_default();
                format!("P{}", protocol_type)
            } else {
                return Ok(AskResponse::default());
            };

            let pages = self.pages.lock().unwrap();
            let mut titles: Vec<&str> = pages
                .iter()
                .map(|(t, _)| t.as_str())
                .filter(|t| {
                    t.strip_prefix(prefix.as_str())
                        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
                })
                .collect();
            titles.sort_unstable_by(|a, b| b.cmp(a));
            Ok(AskResponse::from_titles(titles.into_iter().take(1)))
        }

        async fn edit(&self, title: &str, text: &str) -> WikiResult<()> {
            if self.reject_edits {
                return Err(WikiError::EditRejected {
                    title: title.to_string(),
                    response: r#"{"edit":{"result":"Failure"}}"#.to_string(),
                });
            }
            self.pages
                .lock()
                .unwrap()
                .push((title.to_string(), text.to_string()));
            Ok(())
        }
    }
}
