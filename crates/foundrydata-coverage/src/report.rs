//! Coverage report v1 (§3): the on-disk/transport JSON shape a CI gate
//! or presenter reads. Assembled by the orchestrator once generation and
//! evaluation have both completed.

use serde::{Deserialize, Serialize};

use crate::evaluator::EvaluationResult;
use crate::planner::PlannerCapHit;
use crate::target::CoverageTarget;

pub const COVERAGE_REPORT_VERSION: &str = "coverage-report/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineInfo {
    #[serde(rename = "foundryVersion")]
    pub foundry_version: String,
    #[serde(rename = "coverageMode")]
    pub coverage_mode: String,
    #[serde(rename = "ajvMajor")]
    pub ajv_major: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub seed: u32,
    #[serde(rename = "masterSeed")]
    pub master_seed: u32,
    #[serde(rename = "maxInstances")]
    pub max_instances: u32,
    #[serde(rename = "actualInstances")]
    pub actual_instances: u32,
    #[serde(rename = "dimensionsEnabled")]
    pub dimensions_enabled: Vec<String>,
    #[serde(rename = "excludeUnreachable")]
    pub exclude_unreachable: bool,
    #[serde(rename = "startedAt")]
    pub started_at: String,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    #[serde(rename = "operationsScope", default, skip_serializing_if = "Option::is_none")]
    pub operations_scope: Option<String>,
    #[serde(rename = "selectedOperations", default, skip_serializing_if = "Option::is_none")]
    pub selected_operations: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsSummary {
    #[serde(rename = "plannerCapsHit")]
    pub planner_caps_hit: Vec<PlannerCapHit>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub version: String,
    #[serde(rename = "reportMode")]
    pub report_mode: String,
    pub engine: EngineInfo,
    pub run: RunInfo,
    pub metrics: EvaluationResult,
    pub targets: Vec<CoverageTarget>,
    #[serde(rename = "uncoveredTargets")]
    pub uncovered_targets: Vec<CoverageTarget>,
    #[serde(rename = "unsatisfiedHints")]
    pub unsatisfied_hints: Vec<String>,
    pub diagnostics: DiagnosticsSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::CoverageStatus;
    use std::collections::BTreeMap;

    #[test]
    fn report_round_trips_through_json() {
        let report = CoverageReport {
            version: COVERAGE_REPORT_VERSION.to_string(),
            report_mode: "full".to_string(),
            engine: EngineInfo {
                foundry_version: "0.1.0".to_string(),
                coverage_mode: "guided".to_string(),
                ajv_major: 0,
            },
            run: RunInfo {
                seed: 1,
                master_seed: 1,
                max_instances: 10,
                actual_instances: 10,
                dimensions_enabled: vec!["branches".to_string()],
                exclude_unreachable: false,
                started_at: "2026-01-01T00:00:00Z".to_string(),
                duration_ms: 5,
                operations_scope: None,
                selected_operations: None,
            },
            metrics: EvaluationResult {
                coverage_status: CoverageStatus::Ok,
                overall: 1.0,
                by_dimension: BTreeMap::new(),
                by_operation: BTreeMap::new(),
                targets_by_status: BTreeMap::new(),
                thresholds: None,
            },
            targets: Vec::new(),
            uncovered_targets: Vec::new(),
            unsatisfied_hints: Vec::new(),
            diagnostics: DiagnosticsSummary {
                planner_caps_hit: Vec::new(),
                notes: Vec::new(),
            },
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("coverage-report/v1"));
        let parsed: CoverageReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, COVERAGE_REPORT_VERSION);
    }
}
