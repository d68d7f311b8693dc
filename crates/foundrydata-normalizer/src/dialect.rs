//! Normalizes the declared `$schema` dialect and single/array `type` form
//! to 2020-12 semantics.

use serde_json::Value;

use foundrydata_schema::Dialect;

/// Read `$schema` off the document root and map it to a recognized
/// [`Dialect`], defaulting to 2020-12 when absent or unrecognized — an
/// older draft is still normalized into the 2020-12 view by the rest of
/// this crate, so an unrecognized dialect string is a hint, not an error.
#[must_use]
pub fn detect_dialect(schema: &Value) -> Dialect {
    match schema.get("$schema").and_then(Value::as_str) {
        Some(uri) if uri.contains("draft/2019-09") => Dialect::Draft201909,
        Some(uri) if uri.contains("draft-07") => Dialect::Draft07,
        Some(uri) if uri.contains("oas/3.1") => Dialect::OpenApi31,
        _ => Dialect::Draft202012,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_2020_12_when_unspecified() {
        assert_eq!(detect_dialect(&json!({})), Dialect::Draft202012);
    }

    #[test]
    fn detects_draft07() {
        let schema = json!({"$schema": "http://json-schema.org/draft-07/schema#"});
        assert_eq!(detect_dialect(&schema), Dialect::Draft07);
    }

    #[test]
    fn detects_openapi31() {
        let schema = json!({"$schema": "https://spec.openapis.org/oas/3.1/schema-base"});
        assert_eq!(detect_dialect(&schema), Dialect::OpenApi31);
    }
}
