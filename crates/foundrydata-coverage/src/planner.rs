//! Coverage planner (§4.9): turns analyzed targets into seeded
//! `TestUnit`s, applying deterministic per-dimension/schema/operation
//! caps so a huge schema doesn't explode the instance budget.

use std::collections::BTreeMap;

use foundrydata_generator::options::CoverageHint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::target::{CoverageDimension, CoverageTarget, TargetStatus};

#[derive(Debug, Clone, Default)]
pub struct Caps {
    pub max_targets_per_dimension: BTreeMap<CoverageDimension, usize>,
    pub max_targets_per_schema: Option<usize>,
    pub max_targets_per_operation: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Quick,
    Balanced,
    Thorough,
}

/// Preset `(caps, dimensionPriority, recommendedInstanceBudget)` for a
/// named profile. Priority order determines both the planning sort key
/// and, by convention, which dimensions a bare `--coverage-profile` flag
/// (with no explicit `--coverage-dimensions`) enables.
#[must_use]
pub fn profile_preset(profile: Profile) -> (Caps, Vec<CoverageDimension>, u32) {
    use CoverageDimension::{Boundaries, Branches, Enum, Operations, Structure};
    match profile {
        Profile::Quick => (
            caps_with_uniform_dimension_limit(20),
            vec![Branches, Enum, Structure],
            16,
        ),
        Profile::Balanced => (
            caps_with_uniform_dimension_limit(100),
            vec![Branches, Enum, Boundaries, Structure, Operations],
            64,
        ),
        Profile::Thorough => (
            caps_with_uniform_dimension_limit(1000),
            vec![Branches, Enum, Boundaries, Operations, Structure],
            256,
        ),
    }
}

fn caps_with_uniform_dimension_limit(limit: usize) -> Caps {
    use CoverageDimension::{Boundaries, Branches, Enum, Operations, Structure};
    let mut max_targets_per_dimension = BTreeMap::new();
    for dim in [Structure, Branches, Enum, Boundaries, Operations] {
        max_targets_per_dimension.insert(dim, limit);
    }
    Caps {
        max_targets_per_dimension,
        max_targets_per_schema: Some(limit * 5),
        max_targets_per_operation: Some(limit),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerCapHit {
    pub dimension: CoverageDimension,
    #[serde(rename = "scopeType")]
    pub scope_type: String,
    #[serde(rename = "scopeKey")]
    pub scope_key: String,
    #[serde(rename = "totalTargets")]
    pub total_targets: usize,
    #[serde(rename = "plannedTargets")]
    pub planned_targets: usize,
    #[serde(rename = "unplannedTargets")]
    pub unplanned_targets: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestUnitScope {
    #[serde(rename = "operationKey", default, skip_serializing_if = "Option::is_none")]
    pub operation_key: Option<String>,
    #[serde(rename = "schemaPaths", default, skip_serializing_if = "Option::is_none")]
    pub schema_paths: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct TestUnit {
    pub id: String,
    /// Assigned post-hoc by [`crate::assign_seeds`]; `0` until then.
    pub seed: u32,
    pub count: u32,
    pub hints: Vec<CoverageHint>,
    pub scope: TestUnitScope,
}

#[derive(Debug, Clone, Default)]
pub struct PlanOutput {
    pub units: Vec<TestUnit>,
    pub cap_hits: Vec<PlannerCapHit>,
}

/// Sort key per §4.9: `(operationPresent desc, dimensionPriority,
/// weight desc, canonPath asc, id asc)`.
fn sort_key<'a>(target: &'a CoverageTarget, priority: &'a [CoverageDimension]) -> (std::cmp::Reverse<bool>, usize, std::cmp::Reverse<i64>, &'a str, &'a str) {
    let dim_rank = priority.iter().position(|d| *d == target.dimension).unwrap_or(priority.len());
    let weight = target.weight.unwrap_or(0.0);
    let weight_key = (weight * 1000.0) as i64;
    (
        std::cmp::Reverse(target.operation_key.is_some()),
        dim_rank,
        std::cmp::Reverse(weight_key),
        target.canon_path.as_str(),
        target.id.as_str(),
    )
}

/// Apply caps to `targets` (mutated in place, setting `meta.planned`),
/// then build one `TestUnit` per planned active target.
pub fn plan(targets: &mut [CoverageTarget], dimension_priority: &[CoverageDimension], caps: &Caps) -> PlanOutput {
    let mut order: Vec<usize> = (0..targets.len()).collect();
    order.sort_by(|&a, &b| sort_key(&targets[a], dimension_priority).cmp(&sort_key(&targets[b], dimension_priority)));

    let mut per_dimension_count: BTreeMap<CoverageDimension, usize> = BTreeMap::new();
    let mut per_operation_count: BTreeMap<String, usize> = BTreeMap::new();
    let mut schema_count = 0usize;

    let mut dimension_totals: BTreeMap<CoverageDimension, (usize, usize)> = BTreeMap::new();
    let mut operation_totals: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    for &idx in &order {
        let active = targets[idx].status == TargetStatus::Active;
        if !active {
            targets[idx].set_planned(false);
            continue;
        }

        let dim_limit = caps.max_targets_per_dimension.get(&targets[idx].dimension).copied();
        let dim_count = per_dimension_count.entry(targets[idx].dimension).or_insert(0);
        let schema_limit = caps.max_targets_per_schema;
        let op_key = targets[idx].operation_key.clone();
        let op_limit = caps.max_targets_per_operation;

        let dim_ok = dim_limit.is_none_or(|limit| *dim_count < limit);
        let schema_ok = schema_limit.is_none_or(|limit| schema_count < limit);
        let op_ok = match (&op_key, op_limit) {
            (Some(key), Some(limit)) => *per_operation_count.entry(key.clone()).or_insert(0) < limit,
            _ => true,
        };

        let planned = dim_ok && schema_ok && op_ok;
        targets[idx].set_planned(planned);

        let entry = dimension_totals.entry(targets[idx].dimension).or_insert((0, 0));
        entry.0 += 1;
        if planned {
            entry.1 += 1;
            *dim_count += 1;
            schema_count += 1;
            if let Some(key) = &op_key {
                *per_operation_count.entry(key.clone()).or_insert(0) += 1;
            }
        }

        if let Some(key) = &op_key {
            let op_entry = operation_totals.entry(key.clone()).or_insert((0, 0));
            op_entry.0 += 1;
            if planned {
                op_entry.1 += 1;
            }
        }
    }

    let mut cap_hits = Vec::new();
    for (dimension, (total, planned)) in dimension_totals {
        if planned < total {
            cap_hits.push(PlannerCapHit {
                dimension,
                scope_type: "dimension".to_string(),
                scope_key: format!("{dimension:?}"),
                total_targets: total,
                planned_targets: planned,
                unplanned_targets: total - planned,
            });
        }
    }
    for (op_key, (total, planned)) in operation_totals {
        if planned < total {
            cap_hits.push(PlannerCapHit {
                dimension: CoverageDimension::Operations,
                scope_type: "operation".to_string(),
                scope_key: op_key,
                total_targets: total,
                planned_targets: planned,
                unplanned_targets: total - planned,
            });
        }
    }

    let units = targets
        .iter()
        .filter(|t| t.status == TargetStatus::Active && t.is_planned())
        .map(test_unit_for_target)
        .collect();

    PlanOutput { units, cap_hits }
}

fn test_unit_for_target(target: &CoverageTarget) -> TestUnit {
    let hints = hints_for_target(target).into_iter().collect();
    TestUnit {
        id: target.id.clone(),
        seed: 0,
        count: 1,
        hints,
        scope: TestUnitScope {
            operation_key: target.operation_key.clone(),
            schema_paths: Some(vec![target.canon_path.clone()]),
        },
    }
}

fn hints_for_target(target: &CoverageTarget) -> Option<CoverageHint> {
    let params = target.params.as_ref();
    match target.kind.as_str() {
        "ONEOF_BRANCH" | "ANYOF_BRANCH" => params.and_then(|p| p.get("index")).and_then(Value::as_u64).map(|i| CoverageHint::PreferBranch(i as usize)),
        "PROPERTY_PRESENT" => params
            .and_then(|p| p.get("propertyName"))
            .and_then(Value::as_str)
            .map(|name| CoverageHint::EnsurePropertyPresence(name.to_string(), true)),
        "ENUM_VALUE_HIT" => params.and_then(|p| p.get("enumIndex")).and_then(Value::as_u64).map(|i| CoverageHint::CoverEnumValue(i as usize)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_targets(n: usize) -> Vec<CoverageTarget> {
        (0..n)
            .map(|i| CoverageTarget::new(CoverageDimension::Enum, "ENUM_VALUE_HIT", "#/enum", None, Some(json!({"enumIndex": i}))))
            .collect()
    }

    #[test]
    fn caps_reject_targets_beyond_the_dimension_limit() {
        let mut targets = make_targets(5);
        let mut caps = Caps::default();
        caps.max_targets_per_dimension.insert(CoverageDimension::Enum, 3);
        let output = plan(&mut targets, &[CoverageDimension::Enum], &caps);
        assert_eq!(output.units.len(), 3);
        assert_eq!(output.cap_hits.len(), 1);
        assert_eq!(output.cap_hits[0].unplanned_targets, 2);
    }

    #[test]
    fn planned_targets_sum_matches_cap_accounting() {
        let mut targets = make_targets(10);
        let mut caps = Caps::default();
        caps.max_targets_per_dimension.insert(CoverageDimension::Enum, 4);
        let output = plan(&mut targets, &[CoverageDimension::Enum], &caps);
        let hit = &output.cap_hits[0];
        assert_eq!(hit.planned_targets + hit.unplanned_targets, hit.total_targets);
        assert_eq!(output.units.len(), hit.planned_targets);
    }

    #[test]
    fn enum_target_gets_a_cover_enum_value_hint() {
        let mut targets = make_targets(1);
        let caps = Caps::default();
        let output = plan(&mut targets, &[CoverageDimension::Enum], &caps);
        assert_eq!(output.units[0].hints, vec![CoverageHint::CoverEnumValue(0)]);
    }

    #[test]
    fn unreachable_targets_are_never_planned() {
        let mut targets = make_targets(1);
        targets[0].status = TargetStatus::Unreachable;
        let caps = Caps::default();
        let output = plan(&mut targets, &[CoverageDimension::Enum], &caps);
        assert!(output.units.is_empty());
        assert!(!targets[0].is_planned());
    }
}
