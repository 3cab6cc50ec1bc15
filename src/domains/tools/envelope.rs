//! Success envelope returned by tool executions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single item of tool output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentItem {
    /// Plain text.
    #[serde(rename = "text")]
    Text { text: String },

    /// Arbitrary structured JSON.
    #[serde(rename = "json")]
    StructuredJson { json: Value },
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn json(json: Value) -> Self {
        Self::StructuredJson { json }
    }
}

/// Uniform success response: an ordered list of content items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub content: Vec<ContentItem>,
}

impl ResponseEnvelope {
    pub fn new(content: Vec<ContentItem>) -> Self {
        Self { content }
    }

    /// Envelope with a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![ContentItem::text(text)])
    }

    /// Envelope with a single structured JSON item.
    pub fn json(json: Value) -> Self {
        Self::new(vec![ContentItem::json(json)])
    }
}
