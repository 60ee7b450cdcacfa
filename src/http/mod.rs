//! HTTP API Server Module
//!
//! Exposes the adapter to ELNs:
//! - `POST /adapt`: turn one ELN record into wiki pages
//! - `POST /test`: connectivity check
//! - `GET /health`

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use server::HttpServer;
