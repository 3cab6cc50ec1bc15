//! Declarative input schemas.
//!
//! A [`Schema`] describes the keyed input a capability accepts: the declared
//! fields with their [`FieldSpec`], and which of them are required. Schemas
//! are assembled with [`SchemaBuilder`], which rejects a required field that
//! was never declared, and are immutable afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::RegistryError;

/// The kind of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Object,
}

impl FieldKind {
    /// JSON Schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }

    /// Whether `value` is of this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind name of an arbitrary JSON value, as reported in type mismatches.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Specification of a single input field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub allowed_values: Option<Vec<Value>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Shown to clients in discovery only.
    pub description: Option<String>,
    /// Shown to clients in discovery only; never enforced.
    pub examples: Vec<Value>,
}

impl FieldSpec {
    /// Create a field of the given kind with no constraints.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            allowed_values: None,
            min: None,
            max: None,
            description: None,
            examples: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn object() -> Self {
        Self::new(FieldKind::Object)
    }

    /// Restrict the field to an enumerated set of values.
    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Inclusive lower bound (numbers only).
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Inclusive upper bound (numbers only).
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn examples<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.examples = values.into_iter().map(Into::into).collect();
        self
    }

    /// JSON Schema projection of this field.
    pub fn to_json_schema(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("type".into(), Value::from(self.kind.as_str()));
        if let Some(description) = &self.description {
            out.insert("description".into(), Value::from(description.as_str()));
        }
        if let Some(allowed) = &self.allowed_values {
            out.insert("enum".into(), Value::Array(allowed.clone()));
        }
        if let Some(min) = self.min {
            out.insert("minimum".into(), Value::from(min));
        }
        if let Some(max) = self.max {
            out.insert("maximum".into(), Value::from(max));
        }
        if !self.examples.is_empty() {
            out.insert("examples".into(), Value::Array(self.examples.clone()));
        }
        out
    }
}

/// Input schema of a capability.
///
/// Fields keep their declaration order, which is the order they are
/// validated in and listed under `properties`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldSpec)>,
    required: Vec<String>,
}

impl Schema {
    /// A schema with no fields.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, spec)| spec)
    }

    /// Required field names in declaration order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON Schema projection used for discovery.
    pub fn to_json_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, spec)| (name.clone(), Value::Object(spec.to_json_schema())))
            .collect();

        let mut out = Map::new();
        out.insert("type".into(), Value::from("object"));
        out.insert("properties".into(), Value::Object(properties));
        out.insert(
            "required".into(),
            Value::Array(self.required.iter().cloned().map(Value::from).collect()),
        );
        out
    }
}

impl Serialize for Schema {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_schema().serialize(serializer)
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, FieldSpec)>,
    required: Vec<String>,
}

impl SchemaBuilder {
    /// Declare an optional field.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.declare(name.into(), spec);
        self
    }

    /// Declare a required field.
    pub fn required(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let name = name.into();
        self.mark_required(name.clone());
        self.declare(name, spec);
        self
    }

    /// Redeclaring a name replaces its spec but keeps its position.
    fn declare(&mut self, name: String, spec: FieldSpec) {
        match self.fields.iter_mut().find(|(declared, _)| *declared == name) {
            Some((_, existing)) => *existing = spec,
            None => self.fields.push((name, spec)),
        }
    }

    /// Mark an already (or later) declared field as required.
    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.mark_required(name.into());
        self
    }

    fn mark_required(&mut self, name: String) {
        if !self.required.contains(&name) {
            self.required.push(name);
        }
    }

    /// Check invariants and freeze the schema.
    pub fn build(self) -> Result<Schema, RegistryError> {
        if let Some(field) = self
            .required
            .iter()
            .find(|name| !self.fields.iter().any(|(declared, _)| declared == *name))
        {
            return Err(RegistryError::UndeclaredRequiredField {
                field: field.clone(),
            });
        }

        if let Some((name, _)) = self.fields.iter().find(|(_, spec)| {
            spec.kind != FieldKind::Number && (spec.min.is_some() || spec.max.is_some())
        }) {
            return Err(RegistryError::BoundsOnNonNumeric {
                field: name.clone(),
            });
        }

        Ok(Schema {
            fields: self.fields,
            required: self.required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_schema() {
        let schema = Schema::builder()
            .required("level", FieldSpec::string().one_of(["1", "2"]))
            .field("notes", FieldSpec::string())
            .build()
            .unwrap();

        assert_eq!(schema.required(), ["level".to_string()]);
        assert!(schema.field("notes").is_some());
        assert!(!schema.is_empty());
    }

    #[test]
    fn test_required_must_be_declared() {
        let err = Schema::builder()
            .field("a", FieldSpec::string())
            .require("b")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::UndeclaredRequiredField { field: "b".into() }
        );
    }

    #[test]
    fn test_bounds_only_on_numbers() {
        let err = Schema::builder()
            .field("name", FieldSpec::string().min(1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::BoundsOnNonNumeric { .. }));
    }

    #[test]
    fn test_required_is_deduplicated() {
        let schema = Schema::builder()
            .required("a", FieldSpec::number())
            .require("a")
            .build()
            .unwrap();
        assert_eq!(schema.required().len(), 1);
    }

    #[test]
    fn test_json_schema_projection() {
        let schema = Schema::builder()
            .required(
                "minutes",
                FieldSpec::number().min(5.0).max(60.0).describe("Session length"),
            )
            .field("role", FieldSpec::string().examples(["mom"]))
            .build()
            .unwrap();

        let projected = Value::Object(schema.to_json_schema());
        assert_eq!(
            projected,
            json!({
                "type": "object",
                "properties": {
                    "minutes": {
                        "type": "number",
                        "description": "Session length",
                        "minimum": 5.0,
                        "maximum": 60.0
                    },
                    "role": { "type": "string", "examples": ["mom"] }
                },
                "required": ["minutes"]
            })
        );
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let schema = Schema::builder()
            .required("zone", FieldSpec::string())
            .field("minutes", FieldSpec::number())
            .required("age_band", FieldSpec::string())
            .field("minutes", FieldSpec::number().min(1.0))
            .build()
            .unwrap();

        let names: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["zone", "minutes", "age_band"]);
        assert_eq!(schema.field("minutes").and_then(|f| f.min), Some(1.0));

        let projected = schema.to_json_schema();
        let properties: Vec<_> = projected["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(properties, ["zone", "minutes", "age_band"]);
    }

    #[test]
    fn test_kind_matching() {
        assert!(FieldKind::Number.matches(&json!(1.5)));
        assert!(!FieldKind::Number.matches(&json!("1.5")));
        assert!(FieldKind::Object.matches(&json!({})));
        assert!(!FieldKind::Object.matches(&json!([])));
        assert_eq!(kind_of(&json!([])), "array");
        assert_eq!(kind_of(&Value::Null), "null");
    }
}
