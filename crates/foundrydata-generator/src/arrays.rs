//! Array synthesis (§4.5 "Arrays with contains/uniqueItems"): every
//! `contains` requirement in the node's contains bag is satisfied first,
//! then the array is padded with distinct fillers up to `minItems`.

use foundrydata_composer::ContainsBag;
use foundrydata_rng::XorShift32;
use serde_json::Value;

/// Build the item list for an array node. `contains_items` are values
/// already synthesized to satisfy the bag's requirements (one per unit of
/// `sum_of_minima`); `filler` produces additional distinct items on
/// demand. `unique_items` deduplicates by canonical JSON string.
pub fn assemble_items(
    rng: &mut XorShift32,
    bag: Option<&ContainsBag>,
    min_items: Option<u64>,
    max_items: Option<u64>,
    unique_items: bool,
    mut contains_items: Vec<Value>,
    mut filler: impl FnMut(&mut XorShift32) -> Value,
) -> Vec<Value> {
    let min_items = min_items.unwrap_or(0) as usize;
    let max_items = max_items.map_or(min_items.max(contains_items.len()) + 4, |m| m as usize);

    let mut out = Vec::new();
    let mut seen = std::collections::HashSet::new();

    let required_contains = bag.map_or(0, ContainsBag::sum_of_minima) as usize;
    contains_items.truncate(max_items);
    for item in contains_items.drain(..required_contains.min(contains_items.len())) {
        push_item(&mut out, &mut seen, item, unique_items);
    }

    let mut attempts = 0usize;
    while out.len() < min_items && out.len() < max_items && attempts < max_items * 8 + 32 {
        let candidate = filler(rng);
        push_item(&mut out, &mut seen, candidate, unique_items);
        attempts += 1;
    }
    out
}

fn push_item(out: &mut Vec<Value>, seen: &mut std::collections::HashSet<String>, item: Value, unique_items: bool) {
    if unique_items {
        let key = serde_json::to_string(&item).unwrap_or_default();
        if !seen.insert(key) {
            return;
        }
    }
    out.push(item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pads_to_min_items_with_filler() {
        let mut rng = XorShift32::new(21);
        let mut counter = 0;
        let items = assemble_items(&mut rng, None, Some(3), None, false, Vec::new(), |_| {
            counter += 1;
            json!(counter)
        });
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn unique_items_deduplicates_filler_output() {
        let mut rng = XorShift32::new(22);
        let items = assemble_items(&mut rng, None, Some(3), Some(3), true, Vec::new(), |_| json!("x"));
        assert_eq!(items.len(), 1);
    }
}
