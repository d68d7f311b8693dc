//! Compacts neutral `allOf` members and collapses single-entry `oneOf`.

use serde_json::Value;

use foundrydata_ptrmap::{CanonPointer, PtrMap};

use crate::walk::visit_objects_mut;

/// `true` for a schema that imposes no constraint: the literal `true`, or
/// an empty object `{}`.
fn is_neutral(value: &Value) -> bool {
    matches!(value, Value::Bool(true)) || matches!(value, Value::Object(m) if m.is_empty())
}

/// Drop `allOf` members that are neutral; drop the `allOf` keyword
/// entirely once it is empty or would otherwise add nothing.
pub fn compact_neutral_allof(schema: &mut Value) {
    visit_objects_mut(schema, &CanonPointer::root(), &mut |map, _path| {
        let Some(Value::Array(members)) = map.get("allOf") else {
            return;
        };
        let retained: Vec<Value> = members.iter().filter(|m| !is_neutral(m)).cloned().collect();
        if retained.is_empty() {
            map.remove("allOf");
        } else if retained.len() != members.len() {
            map.insert("allOf".to_string(), Value::Array(retained));
        }
    });
}

/// Collapse a single-entry `oneOf` into its sole member in place, e.g.
/// `{oneOf:[{const:1}]}` becomes `{const:1}`, recording a ptrMap entry
/// from the new (parent) location back to the original `oneOf/0` site.
pub fn collapse_singleton_oneof(schema: &mut Value, ptr_map: &mut PtrMap) {
    visit_objects_mut(schema, &CanonPointer::root(), &mut |map, path| {
        let Some(Value::Array(members)) = map.get("oneOf") else {
            return;
        };
        if members.len() != 1 {
            return;
        }
        let Some(Value::Object(inner)) = members.first().cloned() else {
            return;
        };
        map.remove("oneOf");
        for (key, value) in inner {
            map.insert(key, value);
        }
        let original = path.child("oneOf").child("0");
        ptr_map.insert(path.clone(), original);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drops_neutral_allof_members() {
        let mut schema = json!({"allOf": [true, {}, {"type": "string"}]});
        compact_neutral_allof(&mut schema);
        assert_eq!(schema["allOf"], json!([{"type": "string"}]));
    }

    #[test]
    fn drops_allof_entirely_when_all_neutral() {
        let mut schema = json!({"allOf": [true, {}]});
        compact_neutral_allof(&mut schema);
        assert!(schema.get("allOf").is_none());
    }

    #[test]
    fn collapses_singleton_oneof() {
        let mut schema = json!({"oneOf": [{"const": 1}]});
        let mut ptr_map = PtrMap::new();
        collapse_singleton_oneof(&mut schema, &mut ptr_map);
        assert_eq!(schema, json!({"const": 1}));
        assert!(ptr_map.original_of(&CanonPointer::root()).is_some());
    }

    #[test]
    fn leaves_multi_entry_oneof_untouched() {
        let mut schema = json!({"oneOf": [{"const": 1}, {"const": 2}]});
        let mut ptr_map = PtrMap::new();
        collapse_singleton_oneof(&mut schema, &mut ptr_map);
        assert_eq!(schema["oneOf"].as_array().unwrap().len(), 2);
    }
}
