use foundrydata_ptrmap::CanonPointer;
use serde_json::{Map, Value};

/// Recursively visit every JSON object in `value`, depth-first,
/// post-order (children before the parent that contains them), calling
/// `f` with the object and its canonical pointer. `f` may mutate the
/// object in place; children have already been visited by the time
/// their parent is.
pub fn visit_objects_mut(
    value: &mut Value,
    path: &CanonPointer,
    f: &mut dyn FnMut(&mut Map<String, Value>, &CanonPointer),
) {
    match value {
        Value::Object(map) => {
            let keys: Vec<String> = map.keys().cloned().collect();
            for key in keys {
                if let Some(child) = map.get_mut(&key) {
                    let child_path = path.child(&key);
                    visit_objects_mut(child, &child_path, f);
                }
            }
            f(map, path);
        }
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                let child_path = path.child(&i.to_string());
                visit_objects_mut(item, &child_path, f);
            }
        }
        _ => {}
    }
}
