//! JSON Pointer navigation over an instance tree (RFC 6901 escaping),
//! independent of the schema-side `CanonPointer` — an instance path
//! addresses generated data, not a schema node.

use serde_json::Value;

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[must_use]
pub fn segments(pointer: &str) -> Vec<String> {
    let trimmed = pointer.trim_start_matches('#');
    if trimmed.is_empty() || trimmed == "/" {
        return Vec::new();
    }
    trimmed
        .trim_start_matches('/')
        .split('/')
        .map(unescape)
        .collect()
}

/// Navigate to the parent container of the pointer's final segment,
/// returning `(parent, last_segment)`. Returns `None` if any intermediate
/// segment is missing or not indexable.
pub fn navigate_parent_mut<'a>(root: &'a mut Value, pointer: &str) -> Option<(&'a mut Value, String)> {
    let mut segs = segments(pointer);
    let last = segs.pop()?;
    let mut current = root;
    for seg in &segs {
        current = match current {
            Value::Object(map) => map.get_mut(seg)?,
            Value::Array(arr) => arr.get_mut(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some((current, last))
}

/// Resolve the full pointer, mutably.
pub fn navigate_mut<'a>(root: &'a mut Value, pointer: &str) -> Option<&'a mut Value> {
    let mut current = root;
    for seg in &segments(pointer) {
        current = match current {
            Value::Object(map) => map.get_mut(seg)?,
            Value::Array(arr) => arr.get_mut(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve the full pointer, immutably.
#[must_use]
pub fn navigate<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    let mut current = root;
    for seg in &segments(pointer) {
        current = match current {
            Value::Object(map) => map.get(seg)?,
            Value::Array(arr) => arr.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn navigates_nested_object_and_array() {
        let mut root = json!({"a": {"b": [1, 2, 3]}});
        let (parent, last) = navigate_parent_mut(&mut root, "/a/b/1").unwrap();
        assert_eq!(last, "1");
        assert_eq!(parent[1], json!(2));
    }

    #[test]
    fn unescapes_tilde_and_slash() {
        let segs = segments("/a~1b/c~0d");
        assert_eq!(segs, vec!["a/b".to_string(), "c~d".to_string()]);
    }

    #[test]
    fn root_pointer_has_no_segments() {
        assert!(segments("").is_empty());
        assert!(segments("#").is_empty());
    }
}
