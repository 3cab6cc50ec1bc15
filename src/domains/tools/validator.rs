//! Input validation against a [`Schema`].
//!
//! Validation is fail-fast: the first violation found is returned. Checks run
//! in a fixed order (input shape, required fields in declaration order, then
//! kind / allowed values / bounds per field in schema order) so that the same
//! input always yields the same error.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::ToolError;
use super::schema::{FieldKind, FieldSpec, Schema, kind_of};

/// Input that passed schema validation.
///
/// Unknown fields are kept as supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedInput(Map<String, Value>);

impl ValidatedInput {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn f64(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Deserialize into a typed parameter struct.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}

/// Validate `input` against `schema`.
///
/// `Value::Null` stands for absent input and is accepted only by a schema
/// with no fields.
pub fn validate(schema: &Schema, input: &Value) -> Result<ValidatedInput, ToolError> {
    let object = match input {
        Value::Object(map) => map,
        Value::Null if schema.is_empty() => return Ok(ValidatedInput::default()),
        other => {
            return Err(ToolError::MalformedInput {
                actual: kind_of(other),
            });
        }
    };

    for name in schema.required() {
        if !object.contains_key(name) {
            debug!(field = %name, "Required field missing");
            return Err(ToolError::missing_field(name.as_str()));
        }
    }

    for (name, spec) in schema.fields() {
        if let Some(value) = object.get(name) {
            check_field(name, spec, value)?;
        }
    }

    Ok(ValidatedInput(object.clone()))
}

fn check_field(name: &str, spec: &FieldSpec, value: &Value) -> Result<(), ToolError> {
    if !spec.kind.matches(value) {
        return Err(ToolError::TypeMismatch {
            field: name.to_string(),
            expected: spec.kind,
            actual: kind_of(value),
        });
    }

    if let Some(allowed) = &spec.allowed_values {
        if !allowed.iter().any(|candidate| same_value(candidate, value)) {
            return Err(ToolError::InvalidEnum {
                field: name.to_string(),
                allowed: allowed.clone(),
                actual: value.clone(),
            });
        }
    }

    if spec.kind == FieldKind::Number {
        let actual = value.as_f64().unwrap_or(f64::NAN);
        let below = spec.min.is_some_and(|min| actual < min);
        let above = spec.max.is_some_and(|max| actual > max);
        if below || above {
            return Err(ToolError::OutOfRange {
                field: name.to_string(),
                min: spec.min,
                max: spec.max,
                actual,
            });
        }
    }

    Ok(())
}

/// JSON equality, except that numbers compare by value (`1 == 1.0`).
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::error::ErrorKind;
    use serde::Deserialize;
    use serde_json::json;

    fn plan_schema() -> Schema {
        Schema::builder()
            .required("level", FieldSpec::string().one_of(["1", "2"]))
            .required("minutes", FieldSpec::number().min(5.0).max(60.0))
            .field("notify", FieldSpec::boolean())
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_input_passes() {
        let input = json!({ "level": "1", "minutes": 30 });
        let validated = validate(&plan_schema(), &input).unwrap();
        assert_eq!(validated.str("level"), Some("1"));
        assert_eq!(validated.f64("minutes"), Some(30.0));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let input = json!({ "level": "2", "minutes": 5, "extra": [1, 2] });
        let validated = validate(&plan_schema(), &input).unwrap();
        assert_eq!(validated.get("extra"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_non_object_is_malformed() {
        for input in [Value::Null, json!(3), json!("x"), json!([1])] {
            let err = validate(&plan_schema(), &input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedInput);
        }
    }

    #[test]
    fn test_absent_input_valid_for_empty_schema() {
        let validated = validate(&Schema::empty(), &Value::Null).unwrap();
        assert!(validated.as_map().is_empty());

        let err = validate(&Schema::empty(), &json!(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_missing_required_field() {
        let err = validate(&plan_schema(), &json!({ "level": "1" })).unwrap_err();
        assert_eq!(err, ToolError::missing_field("minutes"));
    }

    #[test]
    fn test_first_missing_field_in_declaration_order() {
        let err = validate(&plan_schema(), &json!({})).unwrap_err();
        assert_eq!(err, ToolError::missing_field("level"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = validate(&plan_schema(), &json!({ "level": "1", "minutes": "30" })).unwrap_err();
        assert_eq!(
            err,
            ToolError::TypeMismatch {
                field: "minutes".into(),
                expected: FieldKind::Number,
                actual: "string",
            }
        );
    }

    #[test]
    fn test_optional_field_still_type_checked() {
        let input = json!({ "level": "1", "minutes": 30, "notify": "yes" });
        let err = validate(&plan_schema(), &input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.field(), Some("notify"));
    }

    #[test]
    fn test_invalid_enum() {
        let err = validate(&plan_schema(), &json!({ "level": "9", "minutes": 30 })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnum);
        assert_eq!(err.field(), Some("level"));
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let schema = plan_schema();
        assert!(validate(&schema, &json!({ "level": "1", "minutes": 5 })).is_ok());
        assert!(validate(&schema, &json!({ "level": "1", "minutes": 60.0 })).is_ok());

        for minutes in [json!(4.99), json!(61), json!(-1)] {
            let err = validate(&schema, &json!({ "level": "1", "minutes": minutes })).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range);
            assert_eq!(err.field(), Some("minutes"));
        }
    }

    #[test]
    fn test_field_checks_follow_declaration_order() {
        let schema = Schema::builder()
            .field("zeta", FieldSpec::number())
            .field("alpha", FieldSpec::string())
            .build()
            .unwrap();

        let err = validate(&schema, &json!({ "alpha": 1, "zeta": "x" })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.field(), Some("zeta"));
    }

    #[test]
    fn test_one_sided_bounds() {
        let schema = Schema::builder()
            .field("floor", FieldSpec::number().min(0.0))
            .field("ceiling", FieldSpec::number().max(10.0))
            .build()
            .unwrap();

        assert!(validate(&schema, &json!({ "floor": 1e9, "ceiling": -1e9 })).is_ok());
        assert!(validate(&schema, &json!({ "floor": 0, "ceiling": 10 })).is_ok());

        let err = validate(&schema, &json!({ "floor": -0.5 })).unwrap_err();
        assert_eq!(err.field(), Some("floor"));
        assert_eq!(err.to_string(), "Field 'floor' must be within [0, inf], got -0.5");

        let err = validate(&schema, &json!({ "ceiling": 10.5 })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.to_string(), "Field 'ceiling' must be within [-inf, 10], got 10.5");
    }

    #[test]
    fn test_numeric_enum_compares_by_value() {
        let schema = Schema::builder()
            .required("size", FieldSpec::number().one_of([1, 2]))
            .build()
            .unwrap();
        assert!(validate(&schema, &json!({ "size": 2.0 })).is_ok());
        assert!(validate(&schema, &json!({ "size": 3 })).is_err());
    }

    #[test]
    fn test_parse_into_params() {
        #[derive(Deserialize)]
        struct Params {
            level: String,
            minutes: f64,
        }

        let validated = validate(&plan_schema(), &json!({ "level": "2", "minutes": 12.5 })).unwrap();
        let params: Params = validated.parse().unwrap();
        assert_eq!(params.level, "2");
        assert_eq!(params.minutes, 12.5);
    }
}
