//! Configuration management for the server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults.

use super::transport::TransportConfig;
use crate::domains::tools::DispatchOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Tool dispatch configuration.
    pub dispatch: DispatchConfig,

    /// Tool catalogue configuration.
    pub catalog: CatalogConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for tool dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Execution timeout per tool call in milliseconds. `0` disables it.
    pub tool_timeout_ms: u64,

    /// Whether "tool not found" errors list the valid tool names.
    pub expose_tool_names: bool,
}

/// Configuration for the tool catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL that media links (PDFs, images) are served from.
    pub media_base_url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tool_timeout_ms: 30_000,
            expose_tool_names: true,
        }
    }
}

impl DispatchConfig {
    /// Options for the dispatcher.
    pub fn to_options(&self) -> DispatchOptions {
        DispatchOptions {
            execution_timeout: (self.tool_timeout_ms > 0)
                .then(|| Duration::from_millis(self.tool_timeout_ms)),
            expose_tool_names: self.expose_tool_names,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            media_base_url: "https://example.com".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "capability-dispatch-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            dispatch: DispatchConfig::default(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`. The media base URL
    /// is read from `PUBLIC_BASE_MEDIA_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(timeout) = std::env::var("MCP_TOOL_TIMEOUT_MS") {
            match timeout.parse() {
                Ok(ms) => config.dispatch.tool_timeout_ms = ms,
                Err(_) => warn!(
                    "Ignoring invalid MCP_TOOL_TIMEOUT_MS '{}', using {} ms",
                    timeout, config.dispatch.tool_timeout_ms
                ),
            }
        }

        if let Ok(expose) = std::env::var("MCP_EXPOSE_TOOL_NAMES") {
            config.dispatch.expose_tool_names = expose.to_lowercase() != "false" && expose != "0";
        }

        if let Ok(base_url) = std::env::var("PUBLIC_BASE_MEDIA_URL") {
            info!("Media base URL set to {}", base_url);
            config.catalog.media_base_url = base_url;
        }

        config
    }
}
