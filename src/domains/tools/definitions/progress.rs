//! Progress logging tool definition.
//!
//! Nothing is persisted: the streak and badge are derived from the reported
//! outcome alone.

use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::common::user_id_field;
use crate::domains::tools::envelope::ResponseEnvelope;
use crate::domains::tools::error::RegistryError;
use crate::domains::tools::handlers::{ToolDefinition, ToolHandler};
use crate::domains::tools::schema::{FieldSpec, Schema};
use crate::domains::tools::validator::ValidatedInput;

const OUTCOMES: [&str; 3] = ["completed", "partial", "skipped"];
const NOVICE_BADGE: &str = "Toe-Touch-Novice";

/// Parameters for the progress logging tool.
#[derive(Debug, Clone, Deserialize)]
pub struct LogProgressParams {
    pub user_id: String,
    pub skill: String,
    pub outcome: String,
}

/// Progress logging tool.
pub struct LogProgressTool;

#[async_trait::async_trait]
impl ToolHandler for LogProgressTool {
    #[instrument(skip_all)]
    async fn execute(&self, input: ValidatedInput) -> anyhow::Result<ResponseEnvelope> {
        let params: LogProgressParams = input.parse()?;
        info!(
            "Progress for {}: {} {}",
            params.user_id, params.skill, params.outcome
        );

        let earned = params.outcome == "completed";
        let streak_days = if earned { 1 } else { 0 };
        Ok(ResponseEnvelope::json(json!({
            "ok": true,
            "streak_days": streak_days,
            "earned_badge": earned.then_some(NOVICE_BADGE)
        })))
    }
}

impl ToolDefinition for LogProgressTool {
    const NAME: &'static str = "log_progress";
    const DESCRIPTION: &'static str = "Logs a skill completion (stub).";

    fn schema() -> Result<Schema, RegistryError> {
        Schema::builder()
            .required("user_id", user_id_field())
            .required("skill", FieldSpec::string())
            .required("outcome", FieldSpec::string().one_of(OUTCOMES))
            .build()
    }
}
