//! Type-default values used to fill a missing required key (§4.6).

use serde_json::{Number, Value};

/// A minimal type-appropriate default for `schema_node`, honoring
/// `minimum`/`minLength` where present so the default doesn't
/// immediately fail the very constraint repair is trying to satisfy.
#[must_use]
pub fn type_default(schema_node: Option<&Value>) -> Value {
    let Some(Value::Object(map)) = schema_node else {
        return Value::String(String::new());
    };

    let declared_type = map.get("type").and_then(Value::as_str).unwrap_or_else(|| {
        if map.contains_key("properties") {
            "object"
        } else if map.contains_key("items") {
            "array"
        } else {
            "string"
        }
    });

    match declared_type {
        "integer" => {
            let minimum = map.get("minimum").and_then(Value::as_i64).unwrap_or(0);
            Value::Number(Number::from(minimum))
        }
        "number" => {
            let minimum = map.get("minimum").and_then(Value::as_f64).unwrap_or(0.0);
            Number::from_f64(minimum).map_or(Value::Number(Number::from(0)), Value::Number)
        }
        "boolean" => Value::Bool(false),
        "array" => Value::Array(Vec::new()),
        "object" => Value::Object(serde_json::Map::new()),
        "null" => Value::Null,
        _ => {
            let min_length = map.get("minLength").and_then(Value::as_u64).unwrap_or(0) as usize;
            Value::String("x".repeat(min_length))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_default_respects_minimum() {
        let schema = json!({"type": "integer", "minimum": 5});
        assert_eq!(type_default(Some(&schema)), json!(5));
    }

    #[test]
    fn string_default_respects_min_length() {
        let schema = json!({"type": "string", "minLength": 3});
        assert_eq!(type_default(Some(&schema)), json!("xxx"));
    }

    #[test]
    fn unknown_schema_defaults_to_empty_string() {
        assert_eq!(type_default(None), json!(""));
    }
}
