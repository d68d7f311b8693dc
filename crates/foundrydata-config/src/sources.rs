//! Parsing the string vocabulary `foundrydata.toml`, environment
//! variables, and the CLI all share (dimension names, profile names,
//! report modes, …), plus the raw, all-`Option` layers those two
//! non-programmatic sources deserialize into before
//! [`crate::builder::ConfigBuilder`] merges them.

use std::env;

use foundrydata_coverage::{CoverageDimension, Profile, ReportMode};
use serde::Deserialize;

use crate::model::{Compat, CoverageMode};
use foundrydata_utils::error::ConfigError;

#[must_use]
pub fn parse_compat(raw: &str) -> Result<Compat, ConfigError> {
    match raw {
        "strict" => Ok(Compat::Strict),
        "lax" => Ok(Compat::Lax),
        other => Err(ConfigError::InvalidValue {
            key: "compat".to_string(),
            value: other.to_string(),
        }),
    }
}

#[must_use]
pub fn parse_coverage_mode(raw: &str) -> Result<CoverageMode, ConfigError> {
    match raw {
        "off" => Ok(CoverageMode::Off),
        "measure" => Ok(CoverageMode::Measure),
        "guided" => Ok(CoverageMode::Guided),
        other => Err(ConfigError::InvalidValue {
            key: "coverage".to_string(),
            value: other.to_string(),
        }),
    }
}

#[must_use]
pub fn parse_dimension(raw: &str) -> Result<CoverageDimension, ConfigError> {
    match raw {
        "structure" => Ok(CoverageDimension::Structure),
        "branches" => Ok(CoverageDimension::Branches),
        "enum" => Ok(CoverageDimension::Enum),
        "boundaries" => Ok(CoverageDimension::Boundaries),
        "operations" => Ok(CoverageDimension::Operations),
        other => Err(ConfigError::UnknownDimension(other.to_string())),
    }
}

pub fn parse_dimensions(raw: &str) -> Result<Vec<CoverageDimension>, ConfigError> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(parse_dimension).collect()
}

#[must_use]
pub fn parse_profile(raw: &str) -> Result<Profile, ConfigError> {
    match raw {
        "quick" => Ok(Profile::Quick),
        "balanced" => Ok(Profile::Balanced),
        "thorough" => Ok(Profile::Thorough),
        other => Err(ConfigError::InvalidValue {
            key: "coverage-profile".to_string(),
            value: other.to_string(),
        }),
    }
}

#[must_use]
pub fn parse_report_mode(raw: &str) -> Result<ReportMode, ConfigError> {
    match raw {
        "full" => Ok(ReportMode::Full),
        "summary" => Ok(ReportMode::Summary),
        other => Err(ConfigError::InvalidValue {
            key: "coverage-report-mode".to_string(),
            value: other.to_string(),
        }),
    }
}

/// `[coverage]` table of a `foundrydata.toml`/`.yaml` project file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileCoverageSection {
    pub mode: Option<String>,
    pub dimensions: Option<Vec<String>>,
    pub profile: Option<String>,
    pub min: Option<f64>,
    pub report: Option<String>,
    pub report_mode: Option<String>,
}

/// The project-file shape: a `[defaults]` table plus an optional nested
/// `[coverage]` table, matching the teacher's layered-`sources` file
/// convention (a flat defaults table, domain-specific sub-tables).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub defaults: FileDefaults,
    #[serde(default)]
    pub coverage: FileCoverageSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileDefaults {
    pub count: Option<u32>,
    pub seed: Option<u32>,
    pub repair_attempts: Option<u8>,
    pub compat: Option<String>,
    pub resolve_externals: Option<bool>,
    pub print_metrics: Option<bool>,
}

pub fn parse_file_config(toml_source: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(toml_source).map_err(|err| ConfigError::InvalidFile {
        path: "<project file>".into(),
        reason: err.to_string(),
    })
}

/// One field read from the environment, mirroring the `[defaults]`
/// table's keys under a `FOUNDRYDATA_` prefix
/// (`FOUNDRYDATA_SEED`, `FOUNDRYDATA_COVERAGE`, …).
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub count: Option<u32>,
    pub seed: Option<u32>,
    pub repair_attempts: Option<u8>,
    pub compat: Option<String>,
    pub resolve_externals: Option<bool>,
    pub print_metrics: Option<bool>,
    pub coverage_mode: Option<String>,
    pub coverage_dimensions: Option<String>,
    pub coverage_profile: Option<String>,
    pub coverage_min: Option<f64>,
}

/// Read the `FOUNDRYDATA_*` environment variables this process sees.
/// Never reads `FOUNDRYDATA_ENV`/`NODE_ENV`-equivalent flags here — §6
/// is explicit that those only gate presenter verbosity, never
/// generation behavior, so they are handled entirely outside this type.
#[must_use]
pub fn read_env_config() -> EnvConfig {
    EnvConfig {
        count: env::var("FOUNDRYDATA_COUNT").ok().and_then(|v| v.parse().ok()),
        seed: env::var("FOUNDRYDATA_SEED").ok().and_then(|v| v.parse().ok()),
        repair_attempts: env::var("FOUNDRYDATA_REPAIR_ATTEMPTS").ok().and_then(|v| v.parse().ok()),
        compat: env::var("FOUNDRYDATA_COMPAT").ok(),
        resolve_externals: env::var("FOUNDRYDATA_RESOLVE_EXTERNALS").ok().and_then(|v| v.parse().ok()),
        print_metrics: env::var("FOUNDRYDATA_PRINT_METRICS").ok().and_then(|v| v.parse().ok()),
        coverage_mode: env::var("FOUNDRYDATA_COVERAGE").ok(),
        coverage_dimensions: env::var("FOUNDRYDATA_COVERAGE_DIMENSIONS").ok(),
        coverage_profile: env::var("FOUNDRYDATA_COVERAGE_PROFILE").ok(),
        coverage_min: env::var("FOUNDRYDATA_COVERAGE_MIN").ok().and_then(|v| v.parse().ok()),
    }
}
