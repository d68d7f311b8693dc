//! Desugars `definitions` into `$defs`, tracking `$id` scope boundaries so
//! a `$ref` that would cross one is left untouched rather than silently
//! rewritten into a dangling pointer.

use serde_json::{Map, Value};

use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};
use foundrydata_ptrmap::{CanonPointer, PtrMap};

/// One `definitions` block found in the document, together with the
/// pointer of its nearest enclosing `$id` (or the document root).
struct DefsSite {
    pointer: CanonPointer,
    scope_root: CanonPointer,
}

/// One `#/definitions/...` reference found in the document, together
/// with the pointer of its nearest enclosing `$id`.
struct RefSite {
    pointer: CanonPointer,
    target: String,
    scope_root: CanonPointer,
}

/// Desugar every `definitions` keyword into `$defs` under its nearest
/// enclosing absolute `$id` scope. A `$ref` pointing into `definitions`
/// whose own scope differs from the `definitions` block's scope is left
/// untouched and reported via `DEFS_TARGET_MISSING`.
pub fn desugar_definitions(schema: &mut Value, ptr_map: &mut PtrMap, notes: &mut Vec<Envelope>) {
    let mut defs_sites = Vec::new();
    let mut ref_sites = Vec::new();
    collect_sites(schema, &CanonPointer::root(), &CanonPointer::root(), &mut defs_sites, &mut ref_sites);

    if defs_sites.is_empty() {
        return;
    }

    for site in &defs_sites {
        rename_definitions_at(schema, &site.pointer, ptr_map);
    }

    for r in &ref_sites {
        let Some(name) = r.target.strip_prefix("#/definitions/") else {
            continue;
        };
        let owning_site = defs_sites.iter().find(|s| s.scope_root == r.scope_root);
        match owning_site {
            Some(_) => {
                rewrite_ref_at(schema, &r.pointer, &format!("#/$defs/{name}"));
            }
            None => {
                notes.push(Envelope::without_details(
                    DiagnosticCode::DefsTargetMissing,
                    r.pointer.as_str().to_string(),
                    Phase::Normalize,
                ));
            }
        }
    }
}

fn collect_sites(
    value: &Value,
    pointer: &CanonPointer,
    scope_root: &CanonPointer,
    defs_sites: &mut Vec<DefsSite>,
    ref_sites: &mut Vec<RefSite>,
) {
    match value {
        Value::Object(map) => {
            let child_scope = if matches!(map.get("$id"), Some(Value::String(_))) {
                pointer.clone()
            } else {
                scope_root.clone()
            };

            if map.contains_key("definitions") {
                defs_sites.push(DefsSite {
                    pointer: pointer.child("definitions"),
                    scope_root: child_scope.clone(),
                });
            }
            if let Some(Value::String(target)) = map.get("$ref") {
                if target.starts_with("#/definitions/") {
                    ref_sites.push(RefSite {
                        pointer: pointer.child("$ref"),
                        target: target.clone(),
                        scope_root: child_scope.clone(),
                    });
                }
            }
            for (key, child) in map {
                collect_sites(child, &pointer.child(key), &child_scope, defs_sites, ref_sites);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_sites(item, &pointer.child(&i.to_string()), scope_root, defs_sites, ref_sites);
            }
        }
        _ => {}
    }
}

/// Rename the `definitions` object at `pointer`'s parent into `$defs`,
/// merging with an existing `$defs` object if present, and record a
/// ptrMap entry for each moved child.
fn rename_definitions_at(schema: &mut Value, definitions_pointer: &CanonPointer, ptr_map: &mut PtrMap) {
    let segments = definitions_pointer.segments();
    let Some((last, parent_segments)) = segments.split_last() else {
        return;
    };
    let Some(parent_map) = navigate_mut(schema, parent_segments) else {
        return;
    };
    let Some(Value::Object(definitions)) = parent_map.remove(last.as_str()) else {
        return;
    };

    let parent_pointer = {
        let mut p = CanonPointer::root();
        for seg in parent_segments {
            p = p.child(seg);
        }
        p
    };

    let defs_entry = parent_map
        .entry("$defs".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(defs_map) = defs_entry else {
        return;
    };
    for (name, def_schema) in definitions {
        let original = parent_pointer.child("definitions").child(&name);
        let canonical = parent_pointer.child("$defs").child(&name);
        ptr_map.insert(canonical, original);
        defs_map.insert(name, def_schema);
    }
}

fn rewrite_ref_at(schema: &mut Value, ref_pointer: &CanonPointer, new_target: &str) {
    let segments = ref_pointer.segments();
    let Some((last, parent_segments)) = segments.split_last() else {
        return;
    };
    if let Some(parent_map) = navigate_mut(schema, parent_segments) {
        if let Some(entry) = parent_map.get_mut(last.as_str()) {
            *entry = Value::String(new_target.to_string());
        }
    }
}

fn navigate_mut<'a>(value: &'a mut Value, segments: &[String]) -> Option<&'a mut Map<String, Value>> {
    let mut current = value;
    for seg in segments {
        current = match current {
            Value::Object(map) => map.get_mut(seg)?,
            Value::Array(items) => items.get_mut(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match current {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renames_root_definitions_to_defs() {
        let mut schema = json!({
            "definitions": {"pos_int": {"type": "integer", "minimum": 0}},
            "properties": {"n": {"$ref": "#/definitions/pos_int"}}
        });
        let mut ptr_map = PtrMap::new();
        let mut notes = Vec::new();
        desugar_definitions(&mut schema, &mut ptr_map, &mut notes);

        assert!(schema.get("definitions").is_none());
        assert_eq!(schema["$defs"]["pos_int"]["type"], json!("integer"));
        assert_eq!(schema["properties"]["n"]["$ref"], json!("#/$defs/pos_int"));
        assert!(notes.is_empty());
    }

    #[test]
    fn merges_into_existing_defs() {
        let mut schema = json!({
            "$defs": {"existing": {"type": "string"}},
            "definitions": {"pos_int": {"type": "integer"}}
        });
        let mut ptr_map = PtrMap::new();
        let mut notes = Vec::new();
        desugar_definitions(&mut schema, &mut ptr_map, &mut notes);

        assert!(schema["$defs"]["existing"].is_object());
        assert!(schema["$defs"]["pos_int"].is_object());
    }

    #[test]
    fn ref_crossing_id_boundary_is_left_untouched() {
        let mut schema = json!({
            "definitions": {"outer": {"type": "string"}},
            "properties": {
                "nested": {
                    "$id": "https://example.com/nested",
                    "properties": {
                        "x": {"$ref": "#/definitions/outer"}
                    }
                }
            }
        });
        let mut ptr_map = PtrMap::new();
        let mut notes = Vec::new();
        desugar_definitions(&mut schema, &mut ptr_map, &mut notes);

        assert_eq!(
            schema["properties"]["nested"]["properties"]["x"]["$ref"],
            json!("#/definitions/outer")
        );
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].code, DiagnosticCode::DefsTargetMissing);
    }
}
