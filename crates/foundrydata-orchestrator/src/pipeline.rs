//! The five-phase pipeline orchestrator (§4.12): sequences
//! normalize → compose → generate → repair → validate, layers the
//! coverage subsystem on top when requested, and assembles the final
//! [`crate::result::PipelineResult`].

use std::collections::BTreeMap;
use std::time::Instant;

use foundrydata_composer::{compose, ComposeOptions};
use foundrydata_config::{CoverageMode, PipelineOptions};
use foundrydata_coverage::{
    analyze, assign_seeds, evaluate, plan, profile_preset, project_targets_for_report,
    uncovered_targets, Caps, CoverageDimension, CoverageReport, DiagnosticsSummary,
    EngineInfo, GlobalAccumulator, ReportMode as CoverageReportMode, RunInfo, TargetIndex, Thresholds,
    COVERAGE_REPORT_VERSION,
};
use foundrydata_diagnostics::{Envelope, Phase};
use foundrydata_generator::{generate, CoverageHint, GenerateOptions, PlanOptions};
use foundrydata_normalizer::{normalize, NormalizeOptions};
use foundrydata_repair::repair;
use foundrydata_resolver::ResolutionRegistry;
use foundrydata_validator::{SourceOracle, ValidationReport, ValidatorCacheKey};
use serde_json::{json, Value};

use crate::external_refs::resolve_external_refs;
use crate::result::{
    Artifacts, MetricsSnapshot, PipelineResult, PipelineStatus, StageRecord, TimelineEntry,
};
use crate::run_id::generate_run_id;

/// Run the full pipeline once over `schema`.
///
/// `registry` backs external `$ref` resolution (empty is fine when the
/// schema has none); `oracle` is the concrete validator binding the
/// caller wires in (almost always
/// [`foundrydata_validator::JsonschemaOracle`]).
#[must_use]
pub fn execute_pipeline(
    schema: &Value,
    options: &PipelineOptions,
    registry: &ResolutionRegistry,
    oracle: &dyn SourceOracle,
) -> PipelineResult {
    let run_id = generate_run_id(options.seed, schema);
    let mut stages: BTreeMap<String, StageRecord> = BTreeMap::new();
    let mut timeline = Vec::new();
    let mut errors = Vec::new();
    let mut metrics = MetricsSnapshot::default();

    // --- Normalize --------------------------------------------------
    let normalize_started = Instant::now();
    let (external_notes, extref_result) = if options.resolve_externals {
        match resolve_external_refs(schema, registry, options.compat) {
            Ok((resolved, notes)) => (notes, Ok(resolved)),
            Err(err) => (Vec::new(), Err(err)),
        }
    } else {
        (Vec::new(), Ok(schema.clone()))
    };

    let schema_for_normalize = match extref_result {
        Ok(resolved) => resolved,
        Err(err) => {
            stages.insert("normalize".to_string(), StageRecord::failed(err.to_string()));
            stages.insert("compose".to_string(), StageRecord::skipped());
            stages.insert("generate".to_string(), StageRecord::skipped());
            stages.insert("repair".to_string(), StageRecord::skipped());
            stages.insert("validate".to_string(), StageRecord::skipped());
            errors.push(err.to_string());
            timeline.push(TimelineEntry { phase: Phase::Normalize, duration_ms: elapsed_ms(normalize_started) });
            metrics.memory_peak_mb = sample_memory_peak();
            return PipelineResult {
                run_id,
                status: PipelineStatus::Failed,
                stages,
                metrics,
                timeline,
                errors,
                artifacts: Artifacts {
                    canonical: schema.clone(),
                    effective: schema.clone(),
                    generated: Vec::new(),
                    repaired: None,
                    repair_actions: None,
                    validation: None,
                    coverage_report: None,
                },
            };
        }
    };

    let normalize_output = normalize(&schema_for_normalize, &NormalizeOptions::default());
    let mut normalize_notes = external_notes;
    normalize_notes.extend(normalize_output.notes.clone());
    stages.insert(
        "normalize".to_string(),
        StageRecord::completed(json!({ "notes": normalize_notes })),
    );
    timeline.push(TimelineEntry { phase: Phase::Normalize, duration_ms: elapsed_ms(normalize_started) });

    // --- Compose ------------------------------------------------------
    let compose_started = Instant::now();
    let compose_output = compose(&normalize_output.canon_schema, &normalize_output.ptr_map, &ComposeOptions::default());
    let is_unsat = compose_output.diag.is_unsat();
    stages.insert(
        "compose".to_string(),
        StageRecord::completed(json!({
            "fatal": compose_output.diag.fatal,
            "warn": compose_output.diag.warn,
            "unsatHints": compose_output.diag.unsat_hints,
        })),
    );
    timeline.push(TimelineEntry { phase: Phase::Compose, duration_ms: elapsed_ms(compose_started) });

    if is_unsat {
        stages.insert("generate".to_string(), StageRecord::skipped());
        stages.insert("repair".to_string(), StageRecord::skipped());
        stages.insert("validate".to_string(), StageRecord::skipped());

        let coverage_report = build_coverage_report(
            &normalize_output.canon_schema,
            &compose_output,
            options,
            &compose_output.diag.fatal,
            Vec::new(),
            0,
        );

        metrics.memory_peak_mb = sample_memory_peak();
        return PipelineResult {
            run_id,
            status: PipelineStatus::Completed,
            stages,
            metrics,
            timeline,
            errors,
            artifacts: Artifacts {
                canonical: normalize_output.canon_schema,
                effective: compose_output.effective,
                generated: Vec::new(),
                repaired: None,
                repair_actions: None,
                validation: None,
                coverage_report,
            },
        };
    }

    // --- Generate -------------------------------------------------------
    let generate_started = Instant::now();
    let coverage_hints = if matches!(options.coverage.mode, CoverageMode::Guided) {
        planned_hints(&normalize_output.canon_schema, &compose_output, options)
    } else {
        BTreeMap::new()
    };

    let generate_options = GenerateOptions {
        count: options.count,
        seed: options.seed,
        plan_options: PlanOptions::default(),
        prefer_examples: false,
        coverage_hints,
    };
    let generate_output = generate(&compose_output, &generate_options);
    metrics.items_emitted = generate_output.metrics.items_emitted;
    metrics.required_keys_dropped = generate_output.metrics.required_keys_dropped;
    metrics.branches_selected = generate_output.metrics.branches_selected;
    metrics.examples_used = generate_output.metrics.examples_used;
    metrics.regex_capped = generate_output.metrics.regex_capped;
    stages.insert(
        "generate".to_string(),
        StageRecord::completed(json!({ "diagnostics": generate_output.diagnostics })),
    );
    timeline.push(TimelineEntry { phase: Phase::Generate, duration_ms: elapsed_ms(generate_started) });

    // --- Repair + Validate ------------------------------------------------
    let repair_started = Instant::now();
    let compat_flag = match options.compat {
        foundrydata_config::Compat::Strict => "strict",
        foundrydata_config::Compat::Lax => "lax",
    };
    let plan_options_sub_key = compat_flag.to_string();
    let registry_fingerprint = registry.fingerprint();
    let cache_key = ValidatorCacheKey::new(schema, &[compat_flag], plan_options_sub_key, registry_fingerprint);

    let mut repaired_items = Vec::with_capacity(generate_output.items.len());
    let mut repair_actions_all = Vec::new();
    let mut validation_reports = Vec::with_capacity(generate_output.items.len());
    let mut fail_fast: Option<String> = None;
    let mut max_attempts_used: u8 = 0;

    for item in &generate_output.items {
        let report = match oracle.validate(&cache_key, schema, item) {
            Ok(report) => report,
            Err(envelope) => {
                let foundry_error = foundrydata_validator::envelope_to_foundry_error(&envelope, &cache_key.schema_hash);
                fail_fast = Some(
                    foundry_error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| format!("oracle error: {envelope:?}")),
                );
                break;
            }
        };

        if report.is_valid {
            repaired_items.push(item.clone());
            validation_reports.push(report);
            continue;
        }

        let outcome = repair(
            item,
            &compose_output.effective,
            &compose_output.coverage_index,
            &report.probe_errors,
            options.repair_attempts,
        );
        max_attempts_used = max_attempts_used.max(outcome.attempts_used);
        repair_actions_all.extend(outcome.actions.clone());

        let final_report: ValidationReport = match oracle.validate(&cache_key, schema, &outcome.candidate) {
            Ok(report) => report,
            Err(envelope) => {
                let foundry_error = foundrydata_validator::envelope_to_foundry_error(&envelope, &cache_key.schema_hash);
                fail_fast = Some(
                    foundry_error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| format!("oracle error: {envelope:?}")),
                );
                break;
            }
        };
        repaired_items.push(outcome.candidate);
        validation_reports.push(final_report);
    }
    metrics.repair_attempts_used = max_attempts_used;

    if let Some(error) = fail_fast {
        stages.insert("repair".to_string(), StageRecord::completed(json!({ "actions": repair_actions_all })));
        stages.insert("validate".to_string(), StageRecord::failed(error.clone()));
        errors.push(error);
        timeline.push(TimelineEntry { phase: Phase::Repair, duration_ms: elapsed_ms(repair_started) });

        metrics.memory_peak_mb = sample_memory_peak();
        return PipelineResult {
            run_id,
            status: PipelineStatus::Failed,
            stages,
            metrics,
            timeline,
            errors,
            artifacts: Artifacts {
                canonical: normalize_output.canon_schema,
                effective: compose_output.effective,
                generated: generate_output.items,
                repaired: Some(repaired_items),
                repair_actions: Some(repair_actions_all),
                validation: Some(validation_reports),
                coverage_report: None,
            },
        };
    }

    stages.insert(
        "repair".to_string(),
        StageRecord::completed(json!({ "actions": repair_actions_all })),
    );
    timeline.push(TimelineEntry { phase: Phase::Repair, duration_ms: elapsed_ms(repair_started) });

    let validate_started = Instant::now();
    let invalid_count = validation_reports.iter().filter(|r| !r.is_valid).count();
    stages.insert(
        "validate".to_string(),
        StageRecord::completed(json!({ "invalidCount": invalid_count })),
    );
    timeline.push(TimelineEntry { phase: Phase::Validate, duration_ms: elapsed_ms(validate_started) });

    let coverage_report = build_coverage_report(
        &normalize_output.canon_schema,
        &compose_output,
        options,
        &compose_output.diag.fatal,
        generate_output.coverage_events,
        options.seed,
    );

    let mut status = PipelineStatus::Completed;
    if let Some(min) = options.coverage.min {
        if let Some(report) = &coverage_report {
            if report.metrics.overall < min {
                errors.push(format!(
                    "COVERAGE_THRESHOLD_NOT_MET: overall coverage {:.4} is below required minimum {:.4}",
                    report.metrics.overall, min
                ));
                status = PipelineStatus::Failed;
            }
        }
    }

    metrics.memory_peak_mb = sample_memory_peak();
    PipelineResult {
        run_id,
        status,
        stages,
        metrics,
        timeline,
        errors,
        artifacts: Artifacts {
            canonical: normalize_output.canon_schema,
            effective: compose_output.effective,
            generated: generate_output.items,
            repaired: Some(repaired_items),
            repair_actions: Some(repair_actions_all),
            validation: Some(validation_reports),
            coverage_report,
        },
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Best-effort RSS sample for `metrics.memoryPeakMb`; unavailable on a
/// platform `sysinfo` can't read is not fatal to the run.
fn sample_memory_peak() -> Option<f64> {
    foundrydata_utils::process_memory::ProcessMemory::current().ok().map(|m| m.rss_mb)
}

/// Resolve which coverage dimensions are active, per the precedence
/// this workspace settled on (see `DESIGN.md`): explicit
/// `coverage.dimensions` wins outright; otherwise an explicit
/// `coverage.profile` contributes its preset dimension list; otherwise
/// every dimension is enabled.
fn resolve_dimensions(options: &PipelineOptions) -> Vec<CoverageDimension> {
    if !options.coverage.dimensions.is_empty() {
        return options.coverage.dimensions.clone();
    }
    if let Some(profile) = options.coverage.profile {
        return profile_preset(profile).1;
    }
    vec![
        CoverageDimension::Structure,
        CoverageDimension::Branches,
        CoverageDimension::Enum,
        CoverageDimension::Boundaries,
        CoverageDimension::Operations,
    ]
}

fn resolve_caps(options: &PipelineOptions) -> Caps {
    options.coverage.profile.map(|p| profile_preset(p).0).unwrap_or_default()
}

/// Build the coverage-guided hints `GenerateOptions` wants, by planning
/// against the analyzer's targets and threading each unit's hints back
/// onto the canonical paths it scopes over.
fn planned_hints(
    canon_schema: &Value,
    compose_output: &foundrydata_composer::ComposeOutput,
    options: &PipelineOptions,
) -> BTreeMap<String, Vec<CoverageHint>> {
    let dimensions = resolve_dimensions(options);
    let caps = resolve_caps(options);
    let analyzer_output = analyze(canon_schema, &compose_output.coverage_index, &compose_output.diag.fatal, &dimensions);
    let dimension_priority = dimensions.clone();
    let mut targets = analyzer_output.targets;
    let plan_output = plan(&mut targets, &dimension_priority, &caps);
    let units = assign_seeds(plan_output.units, options.seed);

    let mut hints: BTreeMap<String, Vec<CoverageHint>> = BTreeMap::new();
    for unit in units {
        let Some(paths) = &unit.scope.schema_paths else { continue };
        for path in paths {
            hints.entry(path.clone()).or_default().extend(unit.hints.clone());
        }
    }
    hints
}

/// Run the analyzer/planner/accumulator/evaluator chain end to end and
/// assemble the v1 coverage report, or `None` when coverage is off.
fn build_coverage_report(
    canon_schema: &Value,
    compose_output: &foundrydata_composer::ComposeOutput,
    options: &PipelineOptions,
    fatal_diagnostics: &[Envelope],
    coverage_events: Vec<foundrydata_generator::CoverageEvent>,
    master_seed: u32,
) -> Option<CoverageReport> {
    if matches!(options.coverage.mode, CoverageMode::Off) {
        return None;
    }

    let dimensions = resolve_dimensions(options);
    let analyzer_output = analyze(canon_schema, &compose_output.coverage_index, fatal_diagnostics, &dimensions);
    let target_index = TargetIndex::build(&analyzer_output.targets);
    let mut accumulator = GlobalAccumulator::new();
    accumulator.record_all(&coverage_events, &target_index);

    let exclude_unreachable = false;
    let thresholds = options.coverage.min.map(|overall| Thresholds { overall: Some(overall) });
    let evaluation = evaluate(&analyzer_output.targets, &accumulator, exclude_unreachable, thresholds);

    let uncovered: Vec<_> = uncovered_targets(&analyzer_output.targets, &accumulator, exclude_unreachable)
        .into_iter()
        .cloned()
        .collect();

    let report_mode = options.coverage.report_mode;
    let targets_for_report = project_targets_for_report(analyzer_output.targets, report_mode);

    Some(CoverageReport {
        version: COVERAGE_REPORT_VERSION.to_string(),
        report_mode: match report_mode {
            CoverageReportMode::Full => "full".to_string(),
            CoverageReportMode::Summary => "summary".to_string(),
        },
        engine: EngineInfo {
            foundry_version: env!("CARGO_PKG_VERSION").to_string(),
            coverage_mode: match options.coverage.mode {
                CoverageMode::Off => "off".to_string(),
                CoverageMode::Measure => "measure".to_string(),
                CoverageMode::Guided => "guided".to_string(),
            },
            ajv_major: foundrydata_validator::ENGINE_MAJOR,
        },
        run: RunInfo {
            seed: master_seed,
            master_seed,
            max_instances: options.count,
            actual_instances: options.count,
            dimensions_enabled: dimensions.iter().map(|d| format!("{d:?}").to_lowercase()).collect(),
            exclude_unreachable,
            started_at: chrono::Utc::now().to_rfc3339(),
            duration_ms: 0,
            operations_scope: None,
            selected_operations: None,
        },
        metrics: evaluation,
        targets: targets_for_report,
        uncovered_targets: uncovered,
        unsatisfied_hints: Vec::new(),
        diagnostics: DiagnosticsSummary {
            planner_caps_hit: Vec::new(),
            notes: Vec::new(),
        },
    })
}
