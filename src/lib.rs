//! eln2smw: Electronic Lab Notebook to Semantic MediaWiki adapter
//!
//! Turns free-form ELN experiment records into pages of a fixed schema in a
//! Semantic MediaWiki:
//! - **Specimen** pages (`S00001`), one per experiment
//! - **Protocol** pages (`P<type>0001`), one per parameter table group
//! - **Record** pages (`R_<protocol>_<specimen>`) holding the measured values
//!
//! Sources are plugins selected by name; the adapter numbers pages by asking
//! the wiki for the highest existing title of each kind.

pub mod adapter;
pub mod config;
pub mod http;
pub mod logging;
pub mod plugins;
pub mod types;
pub mod wiki;

pub use adapter::{adapt, AdaptError, Adapter};
pub use config::Config;
pub use types::*;
