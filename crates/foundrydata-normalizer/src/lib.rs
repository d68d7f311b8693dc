//! Produces the canonical 2020-12 view of a schema (§4.2): desugars
//! `definitions`, compacts neutral `allOf` members and singleton
//! `oneOf`, rewrites `propertyNames.enum`, lifts conditionals per policy,
//! and normalizes exclusive bounds and dialect — while keeping the
//! `PtrMap` a complete, consistent record of where every canonical node
//! came from.

mod bounds;
mod compact;
mod conditionals;
mod defs;
mod dialect;
mod property_names;
mod types;
mod walk;

pub use dialect::detect_dialect;
pub use types::{NormalizeOptions, NormalizeOutput, RewriteConditionalsPolicy};

use foundrydata_ptrmap::CanonPointer;
use serde_json::Value;

/// Run the full normalization pipeline over `schema`, producing the
/// canonical view, its `PtrMap`, and any `NormalizerNote` diagnostics.
#[must_use]
pub fn normalize(schema: &Value, options: &NormalizeOptions) -> NormalizeOutput {
    let mut canon = schema.clone();
    let mut ptr_map = foundrydata_ptrmap::PtrMap::new();
    let mut notes = Vec::new();

    // Order matters: defs desugaring walks pointers that compaction and
    // conditional lifting would otherwise invalidate.
    defs::desugar_definitions(&mut canon, &mut ptr_map, &mut notes);
    bounds::normalize_exclusive_bounds(&mut canon);
    compact::compact_neutral_allof(&mut canon);
    compact::collapse_singleton_oneof(&mut canon, &mut ptr_map);
    property_names::rewrite_property_names_enum(&mut canon, &mut ptr_map);
    conditionals::lift_conditionals(&mut canon, options.rewrite_conditionals);

    seed_identity_entries(&canon, &CanonPointer::root(), &mut ptr_map);

    NormalizeOutput {
        canon_schema: canon,
        ptr_map,
        notes,
    }
}

/// Every canonical pointer reachable in the final tree must have a
/// `PtrMap` entry (§3 ptrMap completeness). Nodes a rewrite pass already
/// mapped keep that mapping; everything else maps to itself, since it
/// was carried over from the original schema unchanged.
fn seed_identity_entries(value: &Value, pointer: &CanonPointer, ptr_map: &mut foundrydata_ptrmap::PtrMap) {
    if ptr_map.original_of(pointer).is_none() {
        ptr_map.insert(pointer.clone(), pointer.clone());
    }
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                seed_identity_entries(child, &pointer.child(key), ptr_map);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                seed_identity_entries(item, &pointer.child(&i.to_string()), ptr_map);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ptr_map_is_complete_for_every_reachable_node() {
        let schema = json!({
            "type": "object",
            "definitions": {"pos": {"type": "integer", "minimum": 0}},
            "properties": {
                "id": {"$ref": "#/definitions/pos"},
                "name": {"type": "string"}
            },
            "required": ["id", "name"]
        });
        let output = normalize(&schema, &NormalizeOptions::default());

        let mut reachable = Vec::new();
        collect_pointers(&output.canon_schema, &CanonPointer::root(), &mut reachable);
        assert!(output.ptr_map.is_complete_for(&reachable));
    }

    #[test]
    fn normalize_is_idempotent_modulo_canonicalization() {
        let schema = json!({
            "definitions": {"pos": {"type": "integer"}},
            "oneOf": [{"const": 1}],
            "propertyNames": {"enum": ["a", "b"]}
        });
        let once = normalize(&schema, &NormalizeOptions::default());
        let twice = normalize(&once.canon_schema, &NormalizeOptions::default());
        assert_eq!(once.canon_schema, twice.canon_schema);
    }

    fn collect_pointers(value: &Value, pointer: &CanonPointer, out: &mut Vec<CanonPointer>) {
        out.push(pointer.clone());
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    collect_pointers(child, &pointer.child(key), out);
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    collect_pointers(item, &pointer.child(&i.to_string()), out);
                }
            }
            _ => {}
        }
    }
}
