//! Rewrites `propertyNames.enum` into an equivalent
//! `patternProperties`/`additionalProperties:false` pair, so downstream
//! phases only ever have to reason about one admissible-name mechanism.

use serde_json::{Map, Value};

use foundrydata_ptrmap::{CanonPointer, PtrMap};

use crate::walk::visit_objects_mut;

/// Escape every regex metacharacter in `literal` so it matches only
/// itself inside an alternation.
fn escape_literal(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn rewrite_property_names_enum(schema: &mut Value, ptr_map: &mut PtrMap) {
    visit_objects_mut(schema, &CanonPointer::root(), &mut |map, path| {
        let Some(Value::Object(property_names)) = map.get("propertyNames") else {
            return;
        };
        let Some(Value::Array(values)) = property_names.get("enum") else {
            return;
        };
        let names: Vec<String> = values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        if names.len() != values.len() || names.is_empty() {
            return;
        }

        let alternation = names.iter().map(|n| escape_literal(n)).collect::<Vec<_>>().join("|");
        let pattern = format!("^(?:{alternation})$");

        map.remove("propertyNames");

        let pattern_properties = map
            .entry("patternProperties".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(pp) = pattern_properties {
            pp.insert(pattern.clone(), Value::Object(Map::new()));
        }
        map.insert("additionalProperties".to_string(), Value::Bool(false));

        let original = path.child("propertyNames");
        let pattern_path = path.child("patternProperties").child(&pattern);
        let ap_path = path.child("additionalProperties");
        ptr_map.insert(pattern_path, original.clone());
        ptr_map.insert(ap_path, original);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rewrites_enum_into_pattern_and_ap_false() {
        let mut schema = json!({
            "type": "object",
            "propertyNames": {"enum": ["a", "b"]}
        });
        let mut ptr_map = PtrMap::new();
        rewrite_property_names_enum(&mut schema, &mut ptr_map);

        assert!(schema.get("propertyNames").is_none());
        assert_eq!(schema["additionalProperties"], json!(false));
        let pattern_props = schema["patternProperties"].as_object().unwrap();
        assert_eq!(pattern_props.len(), 1);
        let pattern = pattern_props.keys().next().unwrap();
        assert!(pattern.contains("a|b") || pattern.contains("b|a"));
    }

    #[test]
    fn escapes_regex_metacharacters_in_names() {
        let mut schema = json!({"propertyNames": {"enum": ["a.b", "c+d"]}});
        let mut ptr_map = PtrMap::new();
        rewrite_property_names_enum(&mut schema, &mut ptr_map);
        let pattern = schema["patternProperties"]
            .as_object()
            .unwrap()
            .keys()
            .next()
            .unwrap()
            .clone();
        assert!(pattern.contains("a\\.b"));
        assert!(pattern.contains("c\\+d"));
    }

    #[test]
    fn leaves_non_enum_property_names_untouched() {
        let mut schema = json!({"propertyNames": {"pattern": "^[a-z]+$"}});
        let mut ptr_map = PtrMap::new();
        rewrite_property_names_enum(&mut schema, &mut ptr_map);
        assert!(schema.get("propertyNames").is_some());
    }
}
