//! Tools domain module.
//!
//! This module handles all tool-related functionality for the server. Tools
//! are schema-described operations that clients discover and invoke by name.
//!
//! ## Architecture
//!
//! - `schema.rs` - Declarative input schemas
//! - `validator.rs` - Fail-fast input validation against a schema
//! - `handlers.rs` - Capabilities and the `ToolHandler` execution trait
//! - `registry.rs` - Immutable, ordered registry and its builder
//! - `dispatcher.rs` - Lookup, validation, execution and error normalization
//! - `discovery.rs` - Discovery document projection
//! - `envelope.rs` - Success envelope
//! - `error.rs` - Error taxonomy and the `ErrorResult` value
//! - `router.rs` - rmcp ToolRouter built from the registry (STDIO/TCP)
//! - `definitions/` - The tool catalogue (one file per tool family)

pub mod definitions;
pub mod discovery;
pub mod dispatcher;
pub mod envelope;
mod error;
mod handlers;
mod registry;
pub mod router;
pub mod schema;
pub mod validator;

pub use definitions::build_registry;
pub use discovery::{DiscoveryDocument, describe};
pub use dispatcher::{DispatchOptions, Dispatcher};
pub use envelope::{ContentItem, ResponseEnvelope};
pub use error::{ErrorKind, ErrorResult, RegistryError, ToolError};
pub use handlers::{Capability, FnHandler, ToolDefinition, ToolHandler};
pub use registry::{CapabilityDescriptor, Registry, RegistryBuilder};
pub use router::build_tool_router;
pub use schema::{FieldKind, FieldSpec, Schema, SchemaBuilder};
pub use validator::{ValidatedInput, validate};
