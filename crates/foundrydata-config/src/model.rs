//! The resolved option model pipeline callers act on (§6 Public API,
//! §2.3 ambient configuration). Every field here can come from a
//! built-in default, a project file, an environment variable, or an
//! explicit CLI flag/builder call — [`crate::sources`] and
//! [`crate::builder`] are what assign the winning value per field.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use foundrydata_coverage::{CoverageDimension, Profile, ReportMode};

/// `--compat strict|lax` (§6 CLI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compat {
    #[default]
    Strict,
    Lax,
}

/// `--coverage off|measure|guided` (§6 CLI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverageMode {
    #[default]
    Off,
    Measure,
    Guided,
}

/// Which layer last set a given field, kept for `effective_config`-style
/// introspection and for diagnosing "why did it pick this value" bug
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    File,
    Env,
    Cli,
    Programmatic,
}

#[derive(Debug, Clone)]
pub struct CoverageOptions {
    pub mode: CoverageMode,
    pub dimensions: Vec<CoverageDimension>,
    pub profile: Option<Profile>,
    pub min: Option<f64>,
    pub report_path: Option<Utf8PathBuf>,
    pub report_mode: ReportMode,
}

impl Default for CoverageOptions {
    fn default() -> Self {
        Self {
            mode: CoverageMode::Off,
            dimensions: Vec::new(),
            profile: None,
            min: None,
            report_path: None,
            report_mode: ReportMode::Full,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub count: u32,
    pub seed: u32,
    pub repair_attempts: u8,
    pub compat: Compat,
    pub resolve_externals: bool,
    pub print_metrics: bool,
    pub coverage: CoverageOptions,
    /// Which layer set each field, keyed by the same field names
    /// `--print-metrics`/diagnostics would name them by.
    pub source_attribution: BTreeMap<String, ConfigSource>,
}

pub const DEFAULT_COUNT: u32 = 10;
pub const DEFAULT_REPAIR_ATTEMPTS: u8 = 1;

impl Default for PipelineOptions {
    fn default() -> Self {
        let mut source_attribution = BTreeMap::new();
        for field in ["count", "seed", "repairAttempts", "compat", "resolveExternals", "coverage"] {
            source_attribution.insert(field.to_string(), ConfigSource::Default);
        }
        Self {
            count: DEFAULT_COUNT,
            seed: 0,
            repair_attempts: DEFAULT_REPAIR_ATTEMPTS,
            compat: Compat::default(),
            resolve_externals: false,
            print_metrics: false,
            coverage: CoverageOptions::default(),
            source_attribution,
        }
    }
}
