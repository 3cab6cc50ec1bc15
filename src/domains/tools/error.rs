//! Tool-specific error types.
//!
//! Dispatch-time failures are [`ToolError`] values. They are never thrown past
//! the dispatcher: every one of them is turned into a single [`ErrorResult`]
//! with a stable [`ErrorKind`] that transports map onto their own status codes.
//! Startup-time failures (building the registry) are [`RegistryError`]s.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::schema::FieldKind;

/// Stable error kinds reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "ToolNotFound")]
    ToolNotFound,
    #[serde(rename = "MalformedInputError")]
    MalformedInput,
    #[serde(rename = "MissingFieldError")]
    MissingField,
    #[serde(rename = "TypeMismatchError")]
    TypeMismatch,
    #[serde(rename = "InvalidEnumError")]
    InvalidEnum,
    #[serde(rename = "RangeError")]
    Range,
    #[serde(rename = "ExecutionError")]
    Execution,
    /// Registration-time only.
    #[serde(rename = "DuplicateNameError")]
    DuplicateName,
}

impl ErrorKind {
    /// The wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToolNotFound => "ToolNotFound",
            Self::MalformedInput => "MalformedInputError",
            Self::MissingField => "MissingFieldError",
            Self::TypeMismatch => "TypeMismatchError",
            Self::InvalidEnum => "InvalidEnumError",
            Self::Range => "RangeError",
            Self::Execution => "ExecutionError",
            Self::DuplicateName => "DuplicateNameError",
        }
    }

    /// Whether this kind is an input validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput
                | Self::MissingField
                | Self::TypeMismatch
                | Self::InvalidEnum
                | Self::Range
        )
    }

    /// HTTP status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ToolNotFound => 404,
            Self::Execution | Self::DuplicateName => 500,
            _ => 400,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while dispatching a tool call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {name}{}", format_available(.available))]
    NotFound {
        name: String,
        /// Valid tool names, empty when the server does not expose them.
        available: Vec<String>,
    },

    /// The input is not a keyed structure.
    #[error("Malformed input: expected an object, got {actual}")]
    MalformedInput { actual: &'static str },

    /// A required field is absent.
    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    /// A field has the wrong kind.
    #[error("Field '{field}' must be of type {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        actual: &'static str,
    },

    /// A field value is not one of the allowed values.
    #[error("Field '{field}' must be one of {}, got {actual}", format_allowed(.allowed))]
    InvalidEnum {
        field: String,
        allowed: Vec<Value>,
        actual: Value,
    },

    /// A numeric field lies outside its bounds.
    #[error("Field '{field}' must be within [{}, {}], got {actual}", format_lower(.min), format_upper(.max))]
    OutOfRange {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
        actual: f64,
    },

    /// The tool execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The tool timed out during execution.
    #[error("Execution failed: tool timed out after {0} ms")]
    Timeout(u64),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available tools: {})", available.join(", "))
    }
}

fn format_allowed(allowed: &[Value]) -> String {
    let values: Vec<String> = allowed.iter().map(Value::to_string).collect();
    format!("[{}]", values.join(", "))
}

fn format_lower(bound: &Option<f64>) -> String {
    bound.map_or_else(|| "-inf".to_string(), |b| b.to_string())
}

fn format_upper(bound: &Option<f64>) -> String {
    bound.map_or_else(|| "inf".to_string(), |b| b.to_string())
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            available,
        }
    }

    /// Create a new "missing field" error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// The stable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::ToolNotFound,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::InvalidEnum { .. } => ErrorKind::InvalidEnum,
            Self::OutOfRange { .. } => ErrorKind::Range,
            Self::ExecutionFailed(_) | Self::Timeout(_) => ErrorKind::Execution,
        }
    }

    /// The offending field, for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field }
            | Self::TypeMismatch { field, .. }
            | Self::InvalidEnum { field, .. }
            | Self::OutOfRange { field, .. } => Some(field),
            _ => None,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::NotFound { available, .. } if !available.is_empty() => {
                Some(serde_json::json!({ "available": available }))
            }
            Self::MalformedInput { actual } => Some(serde_json::json!({ "actualKind": actual })),
            Self::TypeMismatch {
                expected, actual, ..
            } => Some(serde_json::json!({
                "expectedKind": expected,
                "actualKind": actual
            })),
            Self::InvalidEnum {
                allowed, actual, ..
            } => Some(serde_json::json!({ "allowed": allowed, "actual": actual })),
            Self::OutOfRange {
                min, max, actual, ..
            } => Some(serde_json::json!({ "min": min, "max": max, "actual": actual })),
            _ => None,
        }
    }
}

/// Structured failure returned instead of a response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResult {
    /// Create an error result without field or details.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    /// Serialize into a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({ "kind": self.kind, "message": self.message })
        })
    }
}

impl From<ToolError> for ErrorResult {
    fn from(err: ToolError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            field: err.field().map(str::to_string),
            details: err.details(),
        }
    }
}

impl std::fmt::Display for ErrorResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ErrorResult {}

/// Errors raised while assembling the registry at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A capability with this name is already registered.
    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    /// A schema lists a required field that it does not declare.
    #[error("Schema declares '{field}' as required but has no such field")]
    UndeclaredRequiredField { field: String },

    /// Bounds were set on a field that is not numeric.
    #[error("Bounds set on non-numeric field '{field}'")]
    BoundsOnNonNumeric { field: String },
}

impl RegistryError {
    /// The stable kind of this error, when it has one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::DuplicateName(_) => Some(ErrorKind::DuplicateName),
            _ => None,
        }
    }
}
