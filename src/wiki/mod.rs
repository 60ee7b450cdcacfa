//! Semantic MediaWiki access
//!
//! The adapter only depends on the [`WikiApi`] trait; [`MediaWikiClient`]
//! implements it over the MediaWiki action API (`api.php`):
//!
//! - login with a login token and a session cookie
//! - `action=ask` for SMW queries
//! - `action=edit` with a CSRF token

mod client;
mod traits;
mod types;

pub use client::MediaWikiClient;
pub use traits::{WikiApi, WikiError, WikiResult};
pub use types::{AskQuery, AskResponse};
