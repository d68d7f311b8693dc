use foundrydata_ptrmap::CanonPointer;
use serde_json::Value;

use crate::walk::visit_objects_mut;

/// Normalize draft-04-style boolean `exclusiveMinimum`/`exclusiveMaximum`
/// (paired with a plain `minimum`/`maximum`) into 2020-12's numeric form,
/// where `exclusiveMinimum`/`exclusiveMaximum` carry the bound directly.
pub fn normalize_exclusive_bounds(schema: &mut Value) {
    visit_objects_mut(schema, &CanonPointer::root(), &mut |map, _path| {
        normalize_bound(map, "exclusiveMinimum", "minimum");
        normalize_bound(map, "exclusiveMaximum", "maximum");
    });
}

fn normalize_bound(map: &mut serde_json::Map<String, Value>, exclusive_key: &str, plain_key: &str) {
    let Some(exclusive) = map.get(exclusive_key).cloned() else {
        return;
    };
    match exclusive {
        Value::Bool(true) => {
            if let Some(bound) = map.remove(plain_key) {
                map.insert(exclusive_key.to_string(), bound);
            }
        }
        Value::Bool(false) => {
            map.remove(exclusive_key);
        }
        _ => {}
    }
}
