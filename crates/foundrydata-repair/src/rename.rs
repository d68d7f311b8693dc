//! Renames an inadmissible property key to one the AP:false coverage
//! index proves admissible (§4.6 "renaming a property to a valid name").
//! The preflight is a simple collision check against the object's other
//! keys — schemas with `dependentSchemas`/`oneOf` keyed off property
//! names are a known gap here; see `DESIGN.md`.

use foundrydata_composer::CoverageIndex;
use serde_json::Map;

/// Pick a replacement name for `offending_key` in `siblings`, admissible
/// per `coverage_index` at `canon_path`, that doesn't collide with any
/// existing sibling key.
#[must_use]
pub fn pick_replacement_name(coverage_index: &CoverageIndex, canon_path: &str, siblings: &Map<String, serde_json::Value>, offending_key: &str) -> Option<String> {
    let candidates = coverage_index.enumerate(canon_path)?;
    candidates
        .into_iter()
        .filter(|name| name != offending_key && !siblings.contains_key(name))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn picks_first_unused_admissible_name() {
        let mut index = CoverageIndex::new();
        index.register("#/obj", vec!["a".to_string(), "b".to_string()], &[]);
        let siblings = json!({"a": 1}).as_object().unwrap().clone();
        let picked = pick_replacement_name(&index, "#/obj", &siblings, "c").unwrap();
        assert_eq!(picked, "b");
    }

    #[test]
    fn unregistered_node_has_no_enumerable_replacement() {
        let index = CoverageIndex::new();
        let siblings = Map::new();
        assert!(pick_replacement_name(&index, "#/obj", &siblings, "c").is_none());
    }
}
