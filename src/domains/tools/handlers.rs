//! Capabilities and their execution handlers.
//!
//! A [`Capability`] pairs a name, a description and an input [`Schema`] with a
//! [`ToolHandler`] that does the work. Catalogue tools implement
//! [`ToolDefinition`] on a struct; ad hoc tools can wrap a closure with
//! [`Capability::from_fn`].

use std::sync::Arc;

use super::envelope::ResponseEnvelope;
use super::error::RegistryError;
use super::schema::Schema;
use super::validator::ValidatedInput;

/// Trait for implementing tool execution.
///
/// Handlers receive input that already passed the capability's schema. An
/// `Err` is a business failure; the dispatcher reports it as an execution
/// error.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with validated input.
    async fn execute(&self, input: ValidatedInput) -> anyhow::Result<ResponseEnvelope>;
}

/// Static metadata for a tool defined as a struct.
pub trait ToolDefinition: ToolHandler + Sized + 'static {
    /// The unique name of the tool.
    const NAME: &'static str;

    /// A description of what the tool does.
    const DESCRIPTION: &'static str;

    /// The input schema of the tool.
    fn schema() -> Result<Schema, RegistryError>;
}

/// Adapter turning a synchronous closure into a [`ToolHandler`].
pub struct FnHandler<F>(F);

#[async_trait::async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(&ValidatedInput) -> anyhow::Result<ResponseEnvelope> + Send + Sync,
{
    async fn execute(&self, input: ValidatedInput) -> anyhow::Result<ResponseEnvelope> {
        (self.0)(&input)
    }
}

/// A named, schema-described operation.
#[derive(Clone)]
pub struct Capability {
    name: String,
    description: String,
    schema: Schema,
    handler: Arc<dyn ToolHandler>,
}

impl Capability {
    /// Create a capability from its parts.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Schema,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            handler,
        }
    }

    /// Create a capability backed by a synchronous closure.
    pub fn from_fn<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Schema,
        f: F,
    ) -> Self
    where
        F: Fn(&ValidatedInput) -> anyhow::Result<ResponseEnvelope> + Send + Sync + 'static,
    {
        Self::new(name, description, schema, Arc::new(FnHandler(f)))
    }

    /// Create a capability from a [`ToolDefinition`].
    pub fn from_definition<T: ToolDefinition>(tool: T) -> Result<Self, RegistryError> {
        Ok(Self::new(
            T::NAME,
            T::DESCRIPTION,
            T::schema()?,
            Arc::new(tool),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
