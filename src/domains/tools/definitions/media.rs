//! Media tool definitions.
//!
//! `get_media` returns demo links (video, PDF checklist, image) for a topic;
//! `list_media` lists the topics that have material.

use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::common::{MEDIA_TOPICS, ROLES, age_band_field};
use crate::domains::tools::envelope::ResponseEnvelope;
use crate::domains::tools::error::RegistryError;
use crate::domains::tools::handlers::{ToolDefinition, ToolHandler};
use crate::domains::tools::schema::{FieldSpec, Schema};
use crate::domains::tools::validator::ValidatedInput;

/// YouTube video used for every topic until real media is published.
const DEMO_VIDEO_ID: &str = "M7lc1UVf-VE";

/// Parameters for the get media tool.
#[derive(Debug, Clone, Deserialize)]
pub struct GetMediaParams {
    pub role: String,
    pub age_band: String,
    pub topic: String,
}

/// Media links tool.
pub struct GetMediaTool {
    base_url: String,
}

impl GetMediaTool {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetMediaTool {
    #[instrument(skip_all)]
    async fn execute(&self, input: ValidatedInput) -> anyhow::Result<ResponseEnvelope> {
        let params: GetMediaParams = input.parse()?;
        info!(
            "Media requested: topic {}, role {}, ages {}",
            params.topic, params.role, params.age_band
        );

        Ok(ResponseEnvelope::json(json!({
            "items": [
                {
                    "id": format!("yt_{}", DEMO_VIDEO_ID),
                    "type": "video",
                    "title": "Toe Touch (Demo Video)",
                    "embed_url": format!("https://www.youtube.com/embed/{}", DEMO_VIDEO_ID),
                    "watch_url": format!("https://www.youtube.com/watch?v={}", DEMO_VIDEO_ID),
                    "duration_sec": 18
                },
                {
                    "id": "pdf_checklist_01",
                    "type": "pdf",
                    "title": "Toe Touch Checklist",
                    "url": format!("{}/docs/toe_touch_checklist.pdf", self.base_url)
                },
                {
                    "id": "img_form_cues_01",
                    "type": "image",
                    "title": "Form Cues",
                    "url": format!("{}/images/form_cues.png", self.base_url)
                }
            ]
        })))
    }
}

impl ToolDefinition for GetMediaTool {
    const NAME: &'static str = "get_media";
    const DESCRIPTION: &'static str = "Return video/PDF/image links for a topic and age-band.";

    fn schema() -> Result<Schema, RegistryError> {
        Schema::builder()
            .required("role", FieldSpec::string().examples(ROLES))
            .required("age_band", age_band_field())
            .required("topic", FieldSpec::string().examples(MEDIA_TOPICS))
            .build()
    }
}

/// Media topic listing tool.
pub struct ListMediaTool;

#[async_trait::async_trait]
impl ToolHandler for ListMediaTool {
    async fn execute(&self, _input: ValidatedInput) -> anyhow::Result<ResponseEnvelope> {
        Ok(ResponseEnvelope::json(json!({ "topics": MEDIA_TOPICS })))
    }
}

impl ToolDefinition for ListMediaTool {
    const NAME: &'static str = "list_media";
    const DESCRIPTION: &'static str = "Lists media topics available by role and age band.";

    fn schema() -> Result<Schema, RegistryError> {
        Schema::builder()
            .required("role", FieldSpec::string())
            .required("age_band", age_band_field())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::validator::validate;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_media_uses_base_url() {
        let tool = GetMediaTool::new("https://cdn.test/");
        let schema = GetMediaTool::schema().unwrap();
        let input = validate(
            &schema,
            &json!({ "role": "mom", "age_band": "5-7", "topic": "stretching" }),
        )
        .unwrap();

        let envelope = tool.execute(input).await.unwrap();
        let json = serde_json::to_value(&envelope).unwrap();
        let items = &json["content"][0]["json"]["items"];
        assert_eq!(items.as_array().unwrap().len(), 3);
        assert_eq!(items[0]["type"], "video");
        assert_eq!(items[0]["embed_url"], "https://www.youtube.com/embed/M7lc1UVf-VE");
        assert_eq!(items[1]["url"], "https://cdn.test/docs/toe_touch_checklist.pdf");
        assert_eq!(items[2]["url"], "https://cdn.test/images/form_cues.png");
    }

    #[test]
    fn test_topic_is_not_restricted() {
        let schema = GetMediaTool::schema().unwrap();
        let input = json!({ "role": "coach", "age_band": "8-11", "topic": "anything" });
        assert!(validate(&schema, &input).is_ok());
    }

    #[tokio::test]
    async fn test_list_media_topics() {
        let schema = ListMediaTool::schema().unwrap();
        let input = validate(&schema, &json!({ "role": "mom", "age_band": "12-14" })).unwrap();
        let envelope = ListMediaTool.execute(input).await.unwrap();
        assert_eq!(
            envelope,
            ResponseEnvelope::json(json!({
                "topics": ["toe-touch", "stretching", "competition-prep"]
            }))
        );
    }
}
