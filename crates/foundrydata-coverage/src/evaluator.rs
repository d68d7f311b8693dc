//! Coverage evaluator (§4.11): turns a target list plus an accumulator's
//! hit set into per-dimension/operation ratios, a `coverageStatus`, and
//! the trimmed views `reportMode` asks for.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::accumulator::GlobalAccumulator;
use crate::target::{CoverageDimension, CoverageTarget, TargetStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    Full,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageStatus {
    Ok,
    MinCoverageNotMet,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thresholds {
    pub overall: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "coverageStatus")]
    pub coverage_status: CoverageStatus,
    pub overall: f64,
    #[serde(rename = "byDimension")]
    pub by_dimension: BTreeMap<String, f64>,
    #[serde(rename = "byOperation")]
    pub by_operation: BTreeMap<String, f64>,
    #[serde(rename = "targetsByStatus")]
    pub targets_by_status: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
}

/// Whether `target` counts in a denominator at all. Deprecated
/// (diagnostic-only, e.g. `SCHEMA_REUSED_COVERED`) targets never do —
/// resolving open question (b) of §9 for this implementation: they stay
/// informational only, and never gain denominator weight in a future
/// version without a spec change.
fn is_countable(target: &CoverageTarget, exclude_unreachable: bool) -> bool {
    match target.status {
        TargetStatus::Active => true,
        TargetStatus::Unreachable => !exclude_unreachable,
        TargetStatus::Deprecated => false,
    }
}

fn ratio(hit: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        hit as f64 / total as f64
    }
}

#[must_use]
pub fn evaluate(targets: &[CoverageTarget], accumulator: &GlobalAccumulator, exclude_unreachable: bool, thresholds: Option<Thresholds>) -> EvaluationResult {
    let mut by_dimension_counts: BTreeMap<CoverageDimension, (usize, usize)> = BTreeMap::new();
    let mut by_operation_counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    let mut targets_by_status: BTreeMap<String, usize> = BTreeMap::new();
    let (mut overall_hit, mut overall_total) = (0usize, 0usize);

    for target in targets {
        *targets_by_status.entry(status_label(target.status).to_string()).or_insert(0) += 1;

        if !is_countable(target, exclude_unreachable) {
            continue;
        }
        let hit = accumulator.is_hit(&target.id);

        let dim_entry = by_dimension_counts.entry(target.dimension).or_insert((0, 0));
        dim_entry.1 += 1;
        overall_total += 1;
        if hit {
            dim_entry.0 += 1;
            overall_hit += 1;
        }

        if let Some(op_key) = &target.operation_key {
            let op_entry = by_operation_counts.entry(op_key.clone()).or_insert((0, 0));
            op_entry.1 += 1;
            if hit {
                op_entry.0 += 1;
            }
        }
    }

    let overall = ratio(overall_hit, overall_total);
    let by_dimension = by_dimension_counts.into_iter().map(|(dim, (hit, total))| (dimension_label(dim).to_string(), ratio(hit, total))).collect();
    let by_operation = by_operation_counts.into_iter().map(|(key, (hit, total))| (key, ratio(hit, total))).collect();

    let coverage_status = match &thresholds {
        Some(t) if t.overall.is_some_and(|min| overall < min) => CoverageStatus::MinCoverageNotMet,
        _ => CoverageStatus::Ok,
    };

    EvaluationResult {
        coverage_status,
        overall,
        by_dimension,
        by_operation,
        targets_by_status,
        thresholds,
    }
}

#[must_use]
pub fn uncovered_targets<'a>(targets: &'a [CoverageTarget], accumulator: &GlobalAccumulator, exclude_unreachable: bool) -> Vec<&'a CoverageTarget> {
    targets.iter().filter(|t| is_countable(t, exclude_unreachable) && !accumulator.is_hit(&t.id)).collect()
}

/// `reportMode:"summary"` drops the full per-target array from transport
/// — callers already get `uncoveredTargets` and the `byDimension`/`byOperation`
/// aggregates, which is what a CI gate actually reads.
#[must_use]
pub fn project_targets_for_report(targets: Vec<CoverageTarget>, mode: ReportMode) -> Vec<CoverageTarget> {
    match mode {
        ReportMode::Full => targets,
        ReportMode::Summary => Vec::new(),
    }
}

fn status_label(status: TargetStatus) -> &'static str {
    match status {
        TargetStatus::Active => "active",
        TargetStatus::Unreachable => "unreachable",
        TargetStatus::Deprecated => "deprecated",
    }
}

fn dimension_label(dimension: CoverageDimension) -> &'static str {
    match dimension {
        CoverageDimension::Structure => "structure",
        CoverageDimension::Branches => "branches",
        CoverageDimension::Enum => "enum",
        CoverageDimension::Boundaries => "boundaries",
        CoverageDimension::Operations => "operations",
    }
}
