//! Wires parsed arguments through `foundrydata_config` and into
//! `foundrydata_orchestrator::execute_pipeline`, then presents the
//! result the way §6 describes: items on stdout, diagnostics/metrics on
//! stderr prefixed `[foundrydata]`, exit code from the closed table.

use anyhow::Context;
use camino::Utf8PathBuf;
use foundrydata_config::{ConfigBuilder, sources};
use foundrydata_utils::ExitCode;
use foundrydata_validator::JsonschemaOracle;

use crate::args::GenerateArgs;

pub fn run_generate(args: GenerateArgs) -> anyhow::Result<ExitCode> {
    let cwd = Utf8PathBuf::from_path_buf(std::env::current_dir()?)
        .map_err(|p| anyhow::anyhow!("current directory {p:?} is not valid UTF-8"))?;

    let mut builder = foundrydata_config::resolve_from_environment(&cwd).unwrap_or_else(|_| ConfigBuilder::new());
    builder = apply_cli_overrides(builder, &args)?;
    let options = match builder.build() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("[foundrydata] invalid configuration: {err}");
            return Ok(ExitCode::CLI_ARGS);
        }
    };

    let schema_text = std::fs::read_to_string(&args.schema).with_context(|| format!("reading schema file {}", args.schema))?;
    let schema: serde_json::Value = serde_json::from_str(&schema_text).with_context(|| format!("parsing schema file {} as JSON", args.schema))?;

    let (registry, snapshot_warnings) = match &args.external_ref_snapshot {
        Some(path) => crate::snapshot::load_snapshot_file(path)?,
        None => (foundrydata_resolver::ResolutionRegistry::new(), Vec::new()),
    };
    for warning in &snapshot_warnings {
        eprintln!("[foundrydata] {warning}");
    }

    let oracle = JsonschemaOracle::new();
    let result = foundrydata_orchestrator::execute_pipeline(&schema, &options, &registry, &oracle);

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &result.artifacts.generated).context("writing generated items to stdout")?;
    println!();

    if options.print_metrics {
        eprintln!("[foundrydata] runId={}", result.run_id);
        eprintln!(
            "[foundrydata] metrics: {}",
            serde_json::to_string(&result.metrics).unwrap_or_default()
        );
    }
    for error in &result.errors {
        eprintln!("[foundrydata] {error}");
    }

    if let (Some(report), Some(path)) = (&result.artifacts.coverage_report, &options.coverage.report_path) {
        let body = serde_json::to_string_pretty(report).context("serializing coverage report")?;
        foundrydata_utils::atomic_write::write_file_atomic(path, &body).context("writing coverage report")?;
    }

    Ok(exit_code_for(&result))
}

fn apply_cli_overrides(mut builder: ConfigBuilder, args: &GenerateArgs) -> anyhow::Result<ConfigBuilder> {
    if let Some(count) = args.count {
        builder = builder.count(count);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if let Some(attempts) = args.repair_attempts {
        builder = builder.repair_attempts(attempts);
    }
    if let Some(compat) = &args.compat {
        builder = builder.compat(sources::parse_compat(compat)?);
    }
    if args.resolve_externals {
        builder = builder.resolve_externals(true);
    }
    if args.print_metrics {
        builder = builder.print_metrics(true);
    }
    if let Some(mode) = &args.coverage {
        builder = builder.coverage_mode(sources::parse_coverage_mode(mode)?);
    }
    if let Some(dims) = &args.coverage_dimensions {
        builder = builder.coverage_dimensions(sources::parse_dimensions(dims)?);
    }
    if let Some(profile) = &args.coverage_profile {
        builder = builder.coverage_profile(sources::parse_profile(profile)?);
    }
    if let Some(min) = args.coverage_min {
        builder = builder.coverage_min(min);
    }
    if let Some(path) = &args.coverage_report {
        builder = builder.coverage_report_path(path.clone());
    }
    if let Some(mode) = &args.coverage_report_mode {
        builder = builder.coverage_report_mode(sources::parse_report_mode(mode)?);
    }
    Ok(builder)
}

fn exit_code_for(result: &foundrydata_orchestrator::PipelineResult) -> ExitCode {
    use foundrydata_orchestrator::{PipelineStatus, StageStatus};

    if result.status == PipelineStatus::Failed {
        if result.errors.iter().any(|e| e.contains("COVERAGE_THRESHOLD_NOT_MET")) {
            return ExitCode::COVERAGE_THRESHOLD_NOT_MET;
        }
        return ExitCode::from(classify_failure(result));
    }
    if result.stages.get("generate").map(|s| s.status) == Some(StageStatus::Skipped) {
        return ExitCode::SCHEMA_UNSAT;
    }
    if result.artifacts.validation.as_ref().is_some_and(|reports| reports.iter().any(|r| !r.is_valid)) {
        return ExitCode::VALIDATION_FAILED;
    }
    ExitCode::SUCCESS
}

/// `result.errors` holds `FoundryError`'s `Display` text (see
/// `foundrydata_utils::error`), not the variant name, so the fail-fast
/// category is recovered from the wording each variant's `#[error(...)]`
/// attribute fixes rather than from a separate error code carried
/// alongside the message.
fn classify_failure(result: &foundrydata_orchestrator::PipelineResult) -> i32 {
    let joined = result.errors.join(" ");
    if joined.contains("$ref unresolved")
        || joined.contains("$ref missing")
        || joined.contains("unsafe pattern under additionalProperties")
    {
        return ExitCode::SCHEMA_BUG.as_i32();
    }
    if joined.contains("validator compile error") || joined.contains("oracle flags mismatch") {
        return ExitCode::SCHEMA_BUG.as_i32();
    }
    ExitCode::VALIDATION_FAILED.as_i32()
}
