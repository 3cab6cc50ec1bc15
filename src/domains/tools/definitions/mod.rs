//! Tool definitions module.
//!
//! Each tool is defined in its own file and implements
//! [`ToolDefinition`](super::handlers::ToolDefinition).
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file (e.g., `my_tool.rs`)
//! 2. Define params, implement `ToolHandler` and `ToolDefinition`
//! 3. Export it here
//! 4. Register it in `build_registry_with_clock()`
//!
//! The server, router and HTTP transport pick it up from the registry.

pub mod common;
pub mod media;
pub mod practice_plan;
pub mod progress;
pub mod subscription;

pub use media::{GetMediaParams, GetMediaTool, ListMediaTool};
pub use practice_plan::{PracticePlanParams, PracticePlanTool};
pub use progress::{LogProgressParams, LogProgressTool};
pub use subscription::{CheckSubscriptionParams, CheckSubscriptionTool, Clock, system_clock};

use super::error::RegistryError;
use super::registry::Registry;
use crate::core::config::CatalogConfig;

/// Build the registry of all catalogue tools.
///
/// This is the central place where tools are registered, in the order
/// clients see them listed.
pub fn build_registry(config: &CatalogConfig) -> Result<Registry, RegistryError> {
    build_registry_with_clock(config, system_clock())
}

/// Build the catalogue registry with an explicit clock.
pub fn build_registry_with_clock(
    config: &CatalogConfig,
    clock: Clock,
) -> Result<Registry, RegistryError> {
    let mut builder = Registry::builder();
    builder
        .register_definition(CheckSubscriptionTool::new(clock))?
        .register_definition(PracticePlanTool)?
        .register_definition(GetMediaTool::new(config.media_base_url.as_str()))?
        .register_definition(ListMediaTool)?
        .register_definition(LogProgressTool)?;
    Ok(builder.build())
}
