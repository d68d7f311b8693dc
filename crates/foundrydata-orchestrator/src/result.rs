//! The `PipelineResult` shape (§3, §4.12): one stage record per phase,
//! a metrics snapshot, an emission-ordered timeline, and the artifacts
//! each phase handed downstream.

use std::collections::BTreeMap;

use foundrydata_coverage::CoverageReport;
use foundrydata_diagnostics::Phase;
use foundrydata_repair::RepairAction;
use foundrydata_validator::ValidationReport;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageRecord {
    #[must_use]
    pub fn completed(output: Value) -> Self {
        Self { status: StageStatus::Completed, output: Some(output), error: None }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self { status: StageStatus::Failed, output: None, error: Some(error.into()) }
    }

    #[must_use]
    pub fn skipped() -> Self {
        Self { status: StageStatus::Skipped, output: None, error: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Completed,
    Failed,
}

/// One entry per phase actually entered, in the order it ran (§5
/// ordering guarantees).
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub phase: Phase,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    #[serde(rename = "itemsEmitted")]
    pub items_emitted: usize,
    #[serde(rename = "requiredKeysDropped")]
    pub required_keys_dropped: usize,
    #[serde(rename = "branchesSelected")]
    pub branches_selected: usize,
    #[serde(rename = "examplesUsed")]
    pub examples_used: usize,
    #[serde(rename = "regexCapped")]
    pub regex_capped: usize,
    #[serde(rename = "repairAttemptsUsed")]
    pub repair_attempts_used: u8,
    #[serde(rename = "memoryPeakMb", skip_serializing_if = "Option::is_none")]
    pub memory_peak_mb: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Artifacts {
    pub canonical: Value,
    pub effective: Value,
    pub generated: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repaired: Option<Vec<Value>>,
    #[serde(rename = "repairActions", skip_serializing_if = "Option::is_none")]
    pub repair_actions: Option<Vec<RepairAction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Vec<ValidationReport>>,
    #[serde(rename = "coverageReport", skip_serializing_if = "Option::is_none")]
    pub coverage_report: Option<CoverageReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    #[serde(rename = "runId")]
    pub run_id: String,
    pub status: PipelineStatus,
    pub stages: BTreeMap<String, StageRecord>,
    pub metrics: MetricsSnapshot,
    pub timeline: Vec<TimelineEntry>,
    pub errors: Vec<String>,
    pub artifacts: Artifacts,
}
