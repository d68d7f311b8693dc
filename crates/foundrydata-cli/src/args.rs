//! Command-line surface (§6 CLI, informative): `foundrydata generate
//! --schema <file> [...]`. Parsing only validates shape and type; value
//! semantics (ranges, known enum members) are delegated to
//! `foundrydata_config` so the CLI and a `foundrydata.toml`/env layer
//! never disagree about what a given string means.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "foundrydata", version, about = "Deterministic synthetic data generation and coverage measurement from JSON Schema / OpenAPI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit debug-level spans and include the emitting target in stderr lines.
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate synthetic instances from a JSON Schema / OpenAPI document.
    Generate(GenerateArgs),
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Path to the JSON Schema (or OpenAPI document) to generate from.
    #[arg(long)]
    pub schema: Utf8PathBuf,

    /// Number of instances to generate.
    #[arg(short = 'c', long)]
    pub count: Option<u32>,

    /// RNG seed. Two runs with the same seed and schema produce identical output.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Bounded repair attempts per invalid candidate, in [1, 3].
    #[arg(long, value_name = "1..3")]
    pub repair_attempts: Option<u8>,

    /// `strict` fails fast on an unresolved external $ref; `lax` warns and leaves it untouched.
    #[arg(long, value_name = "strict|lax")]
    pub compat: Option<String>,

    /// Fetch and splice external $refs into the registry before normalizing.
    #[arg(long)]
    pub resolve_externals: bool,

    /// Print the `MetricsSnapshot` to stderr after the run.
    #[arg(long)]
    pub print_metrics: bool,

    /// `off` | `measure` | `guided`.
    #[arg(long, value_name = "off|measure|guided")]
    pub coverage: Option<String>,

    /// Comma-separated: `structure,branches,enum,boundaries,operations`.
    #[arg(long, value_name = "list")]
    pub coverage_dimensions: Option<String>,

    /// `quick` | `balanced` | `thorough`.
    #[arg(long, value_name = "quick|balanced|thorough")]
    pub coverage_profile: Option<String>,

    /// Minimum overall coverage ratio required for a zero exit, in [0, 1].
    #[arg(long, value_name = "0..1")]
    pub coverage_min: Option<f64>,

    /// Write the full `CoverageReport` to this path.
    #[arg(long, value_name = "PATH")]
    pub coverage_report: Option<Utf8PathBuf>,

    /// `full` | `summary`.
    #[arg(long, value_name = "full|summary")]
    pub coverage_report_mode: Option<String>,

    /// Load a pre-resolved external-$ref snapshot (NDJSON, §6) instead of
    /// leaving refs unresolved. Fetching them live is out of scope here.
    #[arg(long, value_name = "PATH")]
    pub external_ref_snapshot: Option<Utf8PathBuf>,
}
