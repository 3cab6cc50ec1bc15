//! Capability dispatch server.
//!
//! A server that publishes a fixed catalogue of named, schema-described tools
//! and executes them on request. Clients discover what is available, then
//! invoke one tool per request; inputs are validated against the tool's schema
//! before its handler runs, and every failure comes back as a structured
//! [`ErrorResult`](domains::tools::ErrorResult).
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: schema, validator, registry, dispatcher and the tool catalogue
//!
//! # Example
//!
//! ```rust,no_run
//! use capability_dispatch_server::core::{Config, McpServer};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = McpServer::from_config(Config::from_env())?;
//!
//!     let envelope = server
//!         .call_tool("list_media", json!({ "role": "coach", "age_band": "8-11" }))
//!         .await?;
//!     println!("{}", serde_json::to_string(&envelope)?);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
