//! Aggregates disjoint `contains` sub-schema requirements into a single
//! "contains bag" per array node and proves infeasibility by summing
//! minima against `maxItems` (§4.3 "contains reasoning").

use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainsRequirement {
    pub min_contains: u64,
    pub max_contains: Option<u64>,
}

/// All `contains`-bearing requirements collected against one array node,
/// e.g. from an `allOf` of several `{contains: ...}` schemas.
#[derive(Debug, Clone, Default)]
pub struct ContainsBag {
    pub requirements: Vec<ContainsRequirement>,
}

impl ContainsBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, requirement: ContainsRequirement) {
        self.requirements.push(requirement);
    }

    #[must_use]
    pub fn sum_of_minima(&self) -> u64 {
        self.requirements.iter().map(|r| r.min_contains).sum()
    }
}

/// `CONTAINS_NEED_MIN_GT_MAX`: a single requirement whose own
/// `minContains` exceeds its `maxContains`.
/// `CONTAINS_UNSAT_BY_SUM`: the sum of every requirement's `minContains`
/// exceeds the array's `maxItems` — even disjoint matches can't fit.
pub fn check_contains_bag(canon_path: &str, bag: &ContainsBag, max_items: Option<u64>) -> Vec<Envelope> {
    let mut out = Vec::new();
    for requirement in &bag.requirements {
        if let Some(max) = requirement.max_contains {
            if requirement.min_contains > max {
                out.push(
                    Envelope::new(
                        DiagnosticCode::ContainsNeedMinGtMax,
                        canon_path.to_string(),
                        Phase::Compose,
                        Some(serde_json::json!({
                            "minContains": requirement.min_contains,
                            "maxContains": max,
                        })),
                    )
                    .expect("details never shadow canonPath"),
                );
            }
        }
    }
    if let Some(max_items) = max_items {
        let sum = bag.sum_of_minima();
        if sum > max_items {
            out.push(
                Envelope::new(
                    DiagnosticCode::ContainsUnsatBySum,
                    canon_path.to_string(),
                    Phase::Compose,
                    Some(serde_json::json!({"sumOfMinima": sum, "maxItems": max_items})),
                )
                .expect("details never shadow canonPath"),
            );
        }
    }
    out
}

/// Collect `contains`/`minContains`/`maxContains` from an array node and
/// from any sibling `allOf` members that also constrain `contains`.
#[must_use]
pub fn collect_contains_bag(array_node: &Value, allof_siblings: &[Value]) -> ContainsBag {
    let mut bag = ContainsBag::new();
    push_if_present(array_node, &mut bag);
    for sibling in allof_siblings {
        push_if_present(sibling, &mut bag);
    }
    bag
}

fn push_if_present(node: &Value, bag: &mut ContainsBag) {
    if node.get("contains").is_none() {
        return;
    }
    let min_contains = node.get("minContains").and_then(Value::as_u64).unwrap_or(1);
    let max_contains = node.get("maxContains").and_then(Value::as_u64);
    bag.push(ContainsRequirement {
        min_contains,
        max_contains,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sums_minima_across_requirements() {
        let mut bag = ContainsBag::new();
        bag.push(ContainsRequirement { min_contains: 2, max_contains: None });
        bag.push(ContainsRequirement { min_contains: 3, max_contains: None });
        assert_eq!(bag.sum_of_minima(), 5);
    }

    #[test]
    fn detects_unsat_by_sum_against_max_items() {
        let mut bag = ContainsBag::new();
        bag.push(ContainsRequirement { min_contains: 3, max_contains: None });
        bag.push(ContainsRequirement { min_contains: 3, max_contains: None });
        let diagnostics = check_contains_bag("#/items", &bag, Some(4));
        assert!(diagnostics.iter().any(|e| e.code == DiagnosticCode::ContainsUnsatBySum));
    }

    #[test]
    fn detects_min_gt_max_on_single_requirement() {
        let mut bag = ContainsBag::new();
        bag.push(ContainsRequirement { min_contains: 5, max_contains: Some(2) });
        let diagnostics = check_contains_bag("#/items", &bag, None);
        assert!(diagnostics.iter().any(|e| e.code == DiagnosticCode::ContainsNeedMinGtMax));
    }

    #[test]
    fn collects_bag_from_node_and_allof_siblings() {
        let array_node = json!({"contains": {"const": 1}, "minContains": 1});
        let siblings = vec![json!({"contains": {"const": 2}, "minContains": 2})];
        let bag = collect_contains_bag(&array_node, &siblings);
        assert_eq!(bag.requirements.len(), 2);
        assert_eq!(bag.sum_of_minima(), 3);
    }
}
