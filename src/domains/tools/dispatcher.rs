//! Request dispatch: resolve, validate, execute, normalize.
//!
//! The dispatcher owns no mutable state. Every failure, including a panic or
//! a timeout inside a tool handler, comes back as an [`ErrorResult`] value.

use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::envelope::ResponseEnvelope;
use super::error::{ErrorResult, ToolError};
use super::registry::Registry;
use super::validator::validate;

/// Dispatch options.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Upper bound on a single handler execution. `None` disables it.
    pub execution_timeout: Option<Duration>,

    /// Include valid tool names in "not found" errors.
    pub expose_tool_names: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            execution_timeout: Some(Duration::from_secs(30)),
            expose_tool_names: true,
        }
    }
}

/// Invokes capabilities of a shared registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_options(registry, DispatchOptions::default())
    }

    pub fn with_options(registry: Arc<Registry>, options: DispatchOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Invoke the tool `name` with raw, untrusted `input`.
    ///
    /// `Value::Null` stands for absent input.
    #[instrument(skip_all, fields(tool = %name))]
    pub async fn invoke(&self, name: &str, input: Value) -> Result<ResponseEnvelope, ErrorResult> {
        self.try_invoke(name, input).await.map_err(|err| {
            warn!(kind = %err.kind(), "Tool call rejected: {}", err);
            ErrorResult::from(err)
        })
    }

    async fn try_invoke(&self, name: &str, input: Value) -> Result<ResponseEnvelope, ToolError> {
        let capability = self.registry.lookup(name).ok_or_else(|| {
            let available = if self.options.expose_tool_names {
                self.registry.names().into_iter().map(str::to_string).collect()
            } else {
                Vec::new()
            };
            ToolError::not_found(name, available)
        })?;

        let validated = validate(capability.schema(), &input)?;

        info!("Executing tool: {}", name);
        let execution = AssertUnwindSafe(capability.handler().execute(validated)).catch_unwind();

        let outcome = match self.options.execution_timeout {
            Some(limit) => tokio::time::timeout(limit, execution)
                .await
                .map_err(|_| ToolError::Timeout(limit.as_millis() as u64))?,
            None => execution.await,
        };

        match outcome {
            Ok(Ok(envelope)) => Ok(envelope),
            Ok(Err(err)) => Err(ToolError::execution_failed(format!("{:#}", err))),
            Err(panic) => Err(ToolError::execution_failed(panic_message(panic.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("tool panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("tool panicked: {}", msg)
    } else {
        "tool panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::envelope::ContentItem;
    use crate::domains::tools::error::ErrorKind;
    use crate::domains::tools::handlers::{Capability, ToolHandler};
    use crate::domains::tools::schema::{FieldSpec, Schema};
    use crate::domains::tools::validator::ValidatedInput;
    use serde_json::json;

    fn plan_registry() -> Arc<Registry> {
        let schema = Schema::builder()
            .required("level", FieldSpec::string().one_of(["1", "2"]))
            .build()
            .unwrap();

        let mut builder = Registry::builder();
        builder
            .register(Capability::from_fn(
                "get_plan",
                "Returns a plan",
                schema,
                |input| {
                    let level = input.str("level").unwrap_or_default();
                    Ok(ResponseEnvelope::text(format!("plan-for-{}", level)))
                },
            ))
            .unwrap();
        builder
            .register(Capability::from_fn(
                "explode",
                "Always fails",
                Schema::empty(),
                |_| anyhow::bail!("internal invariant violated"),
            ))
            .unwrap();
        builder
            .register(Capability::from_fn(
                "panic",
                "Always panics",
                Schema::empty(),
                |_| panic!("kaboom"),
            ))
            .unwrap();
        Arc::new(builder.build())
    }

    struct Sleepy;

    #[async_trait::async_trait]
    impl ToolHandler for Sleepy {
        async fn execute(&self, _input: ValidatedInput) -> anyhow::Result<ResponseEnvelope> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ResponseEnvelope::text("late"))
        }
    }

    #[tokio::test]
    async fn test_valid_invocation() {
        let dispatcher = Dispatcher::new(plan_registry());
        let envelope = dispatcher
            .invoke("get_plan", json!({ "level": "1" }))
            .await
            .unwrap();
        assert_eq!(
            envelope.content,
            vec![ContentItem::Text {
                text: "plan-for-1".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_invalid_enum() {
        let dispatcher = Dispatcher::new(plan_registry());
        let err = dispatcher
            .invoke("get_plan", json!({ "level": "9" }))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidEnum);
        assert_eq!(err.field.as_deref(), Some("level"));
    }

    #[test]
    fn test_dispatcher_usable_after_failures() {
        let dispatcher = Dispatcher::new(plan_registry());
        tokio_test::block_on(async {
            tokio_test::assert_err!(dispatcher.invoke("explode", json!({})).await);
            tokio_test::assert_err!(dispatcher.invoke("panic", json!({})).await);
            tokio_test::assert_ok!(dispatcher.invoke("get_plan", json!({ "level": "2" })).await);
        });
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let dispatcher = Dispatcher::new(plan_registry());
        let err = dispatcher.invoke("missing", json!({})).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ToolNotFound);
        assert!(err.message.contains("missing"));
        assert!(err.message.contains("get_plan"));
    }

    #[tokio::test]
    async fn test_unknown_tool_hides_names() {
        let options = DispatchOptions {
            expose_tool_names: false,
            ..Default::default()
        };
        let dispatcher = Dispatcher::with_options(plan_registry(), options);
        let err = dispatcher.invoke("missing", Value::Null).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ToolNotFound);
        assert!(!err.message.contains("get_plan"));
    }

    #[tokio::test]
    async fn test_business_failure_becomes_execution_error() {
        let dispatcher = Dispatcher::new(plan_registry());
        let err = dispatcher.invoke("explode", Value::Null).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Execution);
        assert!(err.message.contains("internal invariant violated"));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let dispatcher = Dispatcher::new(plan_registry());
        let err = dispatcher.invoke("panic", Value::Null).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Execution);
        assert!(err.message.contains("kaboom"));

        // The dispatcher keeps working afterwards.
        let envelope = dispatcher
            .invoke("get_plan", json!({ "level": "2" }))
            .await
            .unwrap();
        assert_eq!(envelope, ResponseEnvelope::text("plan-for-2"));
    }

    #[tokio::test]
    async fn test_timeout_becomes_execution_error() {
        let mut builder = Registry::builder();
        builder
            .register(Capability::new(
                "sleepy",
                "Sleeps",
                Schema::empty(),
                Arc::new(Sleepy),
            ))
            .unwrap();
        let options = DispatchOptions {
            execution_timeout: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let dispatcher = Dispatcher::with_options(Arc::new(builder.build()), options);

        let err = dispatcher.invoke("sleepy", Value::Null).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Execution);
        assert!(err.message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_envelope_returned_unchanged() {
        let payload = ResponseEnvelope::new(vec![
            ContentItem::json(json!({ "nested": { "list": [1, 2, 3] } })),
            ContentItem::text("second"),
        ]);
        let expected = payload.clone();

        let mut builder = Registry::builder();
        builder
            .register(Capability::from_fn("fixed", "Fixed output", Schema::empty(), move |_| {
                Ok(payload.clone())
            }))
            .unwrap();
        let dispatcher = Dispatcher::new(Arc::new(builder.build()));

        let envelope = dispatcher.invoke("fixed", Value::Null).await.unwrap();
        assert_eq!(envelope, expected);
    }

    #[tokio::test]
    async fn test_concurrent_invocations_are_independent() {
        let dispatcher = Dispatcher::new(plan_registry());
        let calls: Vec<_> = (0..16)
            .map(|i| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    let level = if i % 2 == 0 { "1" } else { "2" };
                    dispatcher.invoke("get_plan", json!({ "level": level })).await
                })
            })
            .collect();

        for (i, call) in calls.into_iter().enumerate() {
            let envelope = call.await.unwrap().unwrap();
            let level = if i % 2 == 0 { "1" } else { "2" };
            assert_eq!(envelope, ResponseEnvelope::text(format!("plan-for-{}", level)));
        }
    }
}
