//! MediaWiki API response shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of `action=ask`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub query: AskQuery,
}

/// The `query` object of an ask response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskQuery {
    /// Page name → result object. SMW encodes an empty result set as `[]`.
    #[serde(default)]
    pub results: Value,
}

impl AskResponse {
    /// Build a response from a list of page names, in result order
    pub fn from_titles<'a>(titles: impl IntoIterator<Item = &'a str>) -> Self {
        let results: serde_json::Map<String, Value> = titles
            .into_iter()
            .map(|t| (t.to_string(), serde_json::json!({ "fulltext": t })))
            .collect();
        Self {
            query: AskQuery {
                results: Value::Object(results),
            },
        }
    }

    /// Full page name of the first result, if any
    pub fn first_fulltext(&self) -> Option<&str> {
        let first = match &self.query.results {
            Value::Object(map) => map.values().next(),
            Value::Array(list) => list.first(),
            _ => None,
        }?;
        first.get("fulltext").and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        match &self.query.results {
            Value::Object(map) => map.is_empty(),
            Value::Array(list) => list.is_empty(),
            _ => true,
        }
    }
}
