//! Concrete end-to-end scenarios (§8 S1-S6) run through the full
//! normalize/compose/generate/repair/validate pipeline.

use foundrydata_config::model::{Compat, CoverageMode};
use foundrydata_config::{CoverageOptions, PipelineOptions};
use foundrydata_coverage::CoverageDimension;
use foundrydata_orchestrator::{PipelineStatus, StageStatus, execute_pipeline};
use foundrydata_resolver::ResolutionRegistry;
use foundrydata_validator::JsonschemaOracle;
use serde_json::json;

fn run(schema: &serde_json::Value, options: &PipelineOptions) -> foundrydata_orchestrator::PipelineResult {
    let registry = ResolutionRegistry::new();
    let oracle = JsonschemaOracle::new();
    execute_pipeline(schema, options, &registry, &oracle)
}

#[test]
fn s1_simple_object_generates_valid_items() {
    let schema = json!({
        "type": "object",
        "properties": {
            "id": {"type": "integer", "minimum": 0},
            "name": {"type": "string", "minLength": 1}
        },
        "required": ["id", "name"],
        "additionalProperties": false
    });
    let mut options = PipelineOptions::default();
    options.count = 1;
    options.seed = 37;

    let result = run(&schema, &options);

    assert_eq!(result.status, PipelineStatus::Completed);
    assert_eq!(result.artifacts.generated.len(), 1);
    let item = &result.artifacts.generated[0];
    assert!(item["id"].as_i64().unwrap() >= 0);
    assert!(item["name"].as_str().unwrap().len() >= 1);
    assert!(result.errors.is_empty());
}

#[test]
fn s2_unsat_required_vs_property_names() {
    let schema = json!({
        "type": "object",
        "required": ["forbidden"],
        "propertyNames": {"enum": ["allowed"]}
    });
    let options = PipelineOptions::default();

    let result = run(&schema, &options);

    assert_eq!(result.stages["generate"].status, StageStatus::Skipped);
    assert_eq!(result.artifacts.generated.len(), 0);
    let compose_output = result.stages["compose"].output.as_ref().unwrap();
    let fatal = compose_output["fatal"].as_array().unwrap();
    assert!(
        fatal.iter().any(|e| e["code"].as_str() == Some("UNSAT_REQUIRED_VS_PROPERTYNAMES")),
        "expected UNSAT_REQUIRED_VS_PROPERTYNAMES among {fatal:?}"
    );
}

#[test]
fn s3_oneof_branch_coverage_guided_meets_or_exceeds_measure() {
    let schema = json!({
        "oneOf": [
            {"type": "object", "properties": {"kind": {"const": "left"}}, "required": ["kind"]},
            {"type": "object", "properties": {"kind": {"const": "right"}}, "required": ["kind"]},
            {"type": "object", "properties": {"kind": {"const": "center"}}, "required": ["kind"]}
        ]
    });

    let mut measure_options = PipelineOptions::default();
    measure_options.count = 48;
    measure_options.seed = 2024;
    measure_options.coverage = CoverageOptions {
        mode: CoverageMode::Measure,
        dimensions: vec![CoverageDimension::Branches],
        ..CoverageOptions::default()
    };
    let measure_result = run(&schema, &measure_options);

    let mut guided_options = measure_options.clone();
    guided_options.coverage.mode = CoverageMode::Guided;
    let guided_result = run(&schema, &guided_options);

    let measure_report = measure_result.artifacts.coverage_report.unwrap();
    let guided_report = guided_result.artifacts.coverage_report.unwrap();

    let branch_targets: Vec<_> = measure_report.targets.iter().filter(|t| t.dimension == CoverageDimension::Branches).collect();
    assert_eq!(branch_targets.len(), 3, "expected exactly 3 ONEOF_BRANCH targets");

    let measure_branches = measure_report.metrics.by_dimension.get("branches").copied().unwrap_or(0.0);
    let guided_branches = guided_report.metrics.by_dimension.get("branches").copied().unwrap_or(0.0);
    assert!(guided_branches > 0.0, "guided run recorded no branch coverage at all");
    assert!(guided_branches >= measure_branches);
}

#[test]
fn s4_enum_coverage_reports_four_values() {
    let schema = json!({"enum": ["red", "green", "blue", "yellow"]});
    let mut options = PipelineOptions::default();
    options.count = 16;
    options.seed = 777;
    options.coverage = CoverageOptions {
        mode: CoverageMode::Guided,
        dimensions: vec![CoverageDimension::Enum],
        ..CoverageOptions::default()
    };

    let result = run(&schema, &options);
    let report = result.artifacts.coverage_report.unwrap();
    let enum_targets: Vec<_> = report.targets.iter().filter(|t| t.dimension == CoverageDimension::Enum).collect();
    assert_eq!(enum_targets.len(), 4);

    let enum_coverage = report.metrics.by_dimension.get("enum").copied().unwrap_or(0.0);
    assert!(enum_coverage > 0.0, "guided run recorded no enum coverage at all");
}

#[test]
fn s6_min_coverage_gate_fails_below_threshold() {
    let schema = json!({
        "oneOf": [
            {"type": "object", "properties": {"kind": {"const": "a"}}, "required": ["kind"]},
            {"type": "object", "properties": {"kind": {"const": "b"}}, "required": ["kind"]}
        ]
    });
    let mut options = PipelineOptions::default();
    options.count = 2;
    options.seed = 2025;
    options.coverage = CoverageOptions {
        mode: CoverageMode::Measure,
        dimensions: vec![CoverageDimension::Structure, CoverageDimension::Branches],
        min: Some(0.8),
        ..CoverageOptions::default()
    };

    let result = run(&schema, &options);

    assert_eq!(result.status, PipelineStatus::Failed);
    assert!(result.errors.iter().any(|e| e.contains("COVERAGE_THRESHOLD_NOT_MET")));
    let report = result.artifacts.coverage_report.unwrap();
    assert!(report.metrics.overall < 0.8);
}

#[test]
fn s5_pattern_properties_complexity_cap_is_reported() {
    let schema = json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {"id": {"type": "string"}},
        "patternProperties": {"^[a-z]{6}$": {"type": "integer"}}
    });
    let options = PipelineOptions::default();

    let result = run(&schema, &options);

    assert_eq!(result.status, PipelineStatus::Completed);
    let compose_output = result.stages["compose"].output.as_ref().unwrap();
    let warn = compose_output["warn"].as_array().unwrap();
    assert!(
        warn.iter().any(|e| e["code"].as_str() == Some("COMPLEXITY_CAP_PATTERNS")),
        "expected COMPLEXITY_CAP_PATTERNS among {warn:?}"
    );
}

#[test]
fn lax_compat_warns_instead_of_failing_on_unresolved_external_ref() {
    let schema = json!({
        "type": "object",
        "properties": {"widget": {"$ref": "https://example.com/widget.json"}}
    });
    let mut options = PipelineOptions::default();
    options.compat = Compat::Lax;
    options.resolve_externals = true;

    let result = run(&schema, &options);

    assert_eq!(result.status, PipelineStatus::Completed);
}
