//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! This module builds the ToolRouter for STDIO/TCP transport. Every route
//! delegates to the shared [`Dispatcher`], so MCP clients get exactly the same
//! validation and error semantics as the HTTP endpoints.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content, JsonObject, Tool},
};
use serde_json::Value;
use std::sync::Arc;

use super::dispatcher::Dispatcher;
use super::envelope::{ContentItem, ResponseEnvelope};
use super::error::{ErrorKind, ErrorResult};
use super::handlers::Capability;

/// Build the tool router with every registered capability.
pub fn build_tool_router<S>(dispatcher: &Dispatcher) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    dispatcher
        .registry()
        .capabilities()
        .fold(ToolRouter::new(), |router, capability| {
            router.with_route(create_route(capability, dispatcher.clone()))
        })
}

/// Create a Tool model for a capability (metadata).
pub fn to_tool(capability: &Capability) -> Tool {
    Tool {
        name: capability.name().to_string().into(),
        description: Some(capability.description().to_string().into()),
        input_schema: Arc::new(capability.schema().to_json_schema()),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Create a ToolRoute for STDIO/TCP transport.
fn create_route<S>(capability: &Capability, dispatcher: Dispatcher) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = capability.name().to_string();
    ToolRoute::new_dyn(to_tool(capability), move |ctx: ToolCallContext<'_, S>| {
        let input = arguments_to_input(ctx.arguments.clone());
        let dispatcher = dispatcher.clone();
        let name = name.clone();
        async move { to_call_result(dispatcher.invoke(&name, input).await) }.boxed()
    })
}

/// Missing arguments are passed on as null, which only a schema without
/// fields accepts.
fn arguments_to_input(arguments: Option<JsonObject>) -> Value {
    arguments.map_or(Value::Null, Value::Object)
}

/// Map a dispatch outcome onto MCP.
///
/// Lookup and validation failures become `invalid_params` protocol errors
/// carrying the [`ErrorResult`] as data; execution failures become a tool
/// result flagged as an error.
pub fn to_call_result(
    outcome: Result<ResponseEnvelope, ErrorResult>,
) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(envelope) => Ok(CallToolResult::success(to_contents(envelope)?)),
        Err(err) if err.kind == ErrorKind::Execution => {
            Ok(CallToolResult::error(vec![Content::text(err.message)]))
        }
        Err(err) => {
            let data = err.to_value();
            Err(McpError::invalid_params(err.message, Some(data)))
        }
    }
}

fn to_contents(envelope: ResponseEnvelope) -> Result<Vec<Content>, McpError> {
    envelope
        .content
        .into_iter()
        .map(|item| match item {
            ContentItem::Text { text } => Ok(Content::text(text)),
            ContentItem::StructuredJson { json } => Content::json(json),
        })
        .collect()
}
