//! Server implementation and lifecycle management.
//!
//! This module contains the main server handler. It owns the immutable tool
//! registry (through the [`Dispatcher`]) and exposes it two ways:
//! - as an rmcp `ToolRouter` for the STDIO/TCP transports
//! - as plain discovery/invocation methods for the HTTP transport
//!
//! Both paths go through the same dispatcher.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use super::error::{self, Error};
use crate::domains::tools::{
    DiscoveryDocument, Dispatcher, ErrorResult, Registry, ResponseEnvelope, build_registry,
    build_tool_router, describe,
};

/// The main server handler.
///
/// Cloning is cheap: the registry is shared.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher over the shared registry.
    dispatcher: Dispatcher,

    /// Tool router for handling MCP tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server exposing `registry`.
    pub fn new(config: Config, registry: Registry) -> error::Result<Self> {
        if config.server.name.trim().is_empty() {
            return Err(Error::config("server name must not be empty"));
        }

        let config = Arc::new(config);
        let dispatcher =
            Dispatcher::with_options(Arc::new(registry), config.dispatch.to_options());

        Ok(Self {
            tool_router: build_tool_router::<Self>(&dispatcher),
            dispatcher,
            config,
        })
    }

    /// Create a server exposing the built-in tool catalogue.
    ///
    /// Fails if the catalogue cannot be registered (e.g. duplicate names).
    pub fn from_config(config: Config) -> error::Result<Self> {
        let registry = build_registry(&config.catalog)?;
        info!("Registered {} tools", registry.len());
        Self::new(config, registry)
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        self.dispatcher.registry()
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// Discovery document for this server.
    pub fn discovery(&self) -> DiscoveryDocument<'_> {
        describe(self.name(), self.registry())
    }

    /// Call a tool by name.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ResponseEnvelope, ErrorResult> {
        self.dispatcher.invoke(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(format!(
                "{} exposes {} tools. List them with tools/list and call one per request.",
                self.name(),
                self.registry().len()
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
