//! Practice plan tool definition.
//!
//! Builds a three-section practice plan (warm-up, skills, cool-down) for an
//! age band, skill level and session length.

use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::common::age_band_field;
use crate::domains::tools::envelope::ResponseEnvelope;
use crate::domains::tools::error::RegistryError;
use crate::domains::tools::handlers::{ToolDefinition, ToolHandler};
use crate::domains::tools::schema::{FieldSpec, Schema};
use crate::domains::tools::validator::ValidatedInput;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the practice plan tool.
#[derive(Debug, Clone, Deserialize)]
pub struct PracticePlanParams {
    /// Age band, e.g. "8-11".
    pub age_band: String,

    /// Skill level, "1" to "4".
    pub level: String,

    /// Session length in minutes.
    pub minutes: f64,
}

const LEVELS: [&str; 4] = ["1", "2", "3", "4"];

const WARMUP: [&str; 3] = ["Light jog 2 min", "Arm circles x20", "Neck rolls x10"];
const BEGINNER_SKILLS: [&str; 3] = ["Toe touch drills x10", "High V / Low V x10", "Clap & clean x10"];
const ADVANCED_SKILLS: [&str; 3] = ["Jumps combo x12", "T motions x12", "Core holds 30s x3"];
const COOLDOWN: [&str; 3] = [
    "Hamstring stretch 30s x2",
    "Quad stretch 30s x2",
    "Deep breaths 1 min",
];

// ============================================================================
// Tool Definition
// ============================================================================

/// Practice plan tool.
pub struct PracticePlanTool;

impl PracticePlanTool {
    /// Skill drills for a level. Level 1 gets the beginner set.
    pub fn skills_for(level: &str) -> [&'static str; 3] {
        if level == "1" {
            BEGINNER_SKILLS
        } else {
            ADVANCED_SKILLS
        }
    }

    /// Plan title shown to the athlete.
    pub fn title(params: &PracticePlanParams) -> String {
        format!(
            "Level {} - {} min plan (ages {})",
            params.level, params.minutes, params.age_band
        )
    }
}

#[async_trait::async_trait]
impl ToolHandler for PracticePlanTool {
    #[instrument(skip_all)]
    async fn execute(&self, input: ValidatedInput) -> anyhow::Result<ResponseEnvelope> {
        let params: PracticePlanParams = input.parse()?;
        info!(
            "Practice plan requested: level {}, {} min, ages {}",
            params.level, params.minutes, params.age_band
        );

        Ok(ResponseEnvelope::json(json!({
            "title": Self::title(&params),
            "sections": [
                { "name": "Warm-up", "items": WARMUP },
                { "name": "Skills", "items": Self::skills_for(&params.level) },
                { "name": "Cool-down", "items": COOLDOWN }
            ],
            "badges": ["Consistency-Star"]
        })))
    }
}

impl ToolDefinition for PracticePlanTool {
    const NAME: &'static str = "get_practice_plan";
    const DESCRIPTION: &'static str = "Returns a practice plan by age band, level, and time.";

    fn schema() -> Result<Schema, RegistryError> {
        Schema::builder()
            .required("age_band", age_band_field())
            .required("level", FieldSpec::string().one_of(LEVELS))
            .required(
                "minutes",
                FieldSpec::number()
                    .min(5.0)
                    .max(60.0)
                    .describe("Session length in minutes"),
            )
            .build()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::envelope::ContentItem;
    use crate::domains::tools::validator::validate;
    use serde_json::{Value, json};

    async fn run(input: Value) -> Value {
        let schema = PracticePlanTool::schema().unwrap();
        let validated = validate(&schema, &input).unwrap();
        let envelope = PracticePlanTool.execute(validated).await.unwrap();
        match envelope.content.into_iter().next() {
            Some(ContentItem::StructuredJson { json }) => json,
            other => panic!("Expected JSON content, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_beginner_plan() {
        let plan = run(json!({ "age_band": "8-11", "level": "1", "minutes": 30 })).await;
        assert_eq!(plan["title"], "Level 1 - 30 min plan (ages 8-11)");
        assert_eq!(plan["sections"][1]["name"], "Skills");
        assert_eq!(plan["sections"][1]["items"][0], "Toe touch drills x10");
        assert_eq!(plan["badges"], json!(["Consistency-Star"]));
    }

    #[tokio::test]
    async fn test_advanced_plan() {
        let plan = run(json!({ "age_band": "15-18", "level": "3", "minutes": 12.5 })).await;
        assert_eq!(plan["title"], "Level 3 - 12.5 min plan (ages 15-18)");
        assert_eq!(plan["sections"][1]["items"][0], "Jumps combo x12");
        assert_eq!(plan["sections"][0]["name"], "Warm-up");
        assert_eq!(plan["sections"][2]["name"], "Cool-down");
    }

    #[test]
    fn test_schema_bounds_minutes() {
        let schema = PracticePlanTool::schema().unwrap();
        let minutes = schema.field("minutes").unwrap();
        assert_eq!(minutes.min, Some(5.0));
        assert_eq!(minutes.max, Some(60.0));
        assert_eq!(schema.required().len(), 3);
    }
}
