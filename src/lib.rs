//! taskgate - HTTP middleware for a task-management REST API
//!
//! A Rust application providing:
//! - Forwarding proxy that relays task and auth requests to an upstream API
//! - `Authorization` header pass-through for protected routes
//! - Static serving of the frontend bundle
//! - A scripted exerciser hitting the upstream API directly

pub mod client;
pub mod config;
pub mod error;
pub mod proxy;
pub mod server;

pub use config::AppConfig;
pub use error::ProxyError;
pub use server::{create_server_router, start_server};

/// Application result type
pub type Result<T> = anyhow::Result<T>;
