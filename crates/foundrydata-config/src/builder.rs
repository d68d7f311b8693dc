//! Fluent merge of the four option layers, applied in the order the
//! Public API promises: defaults < project file < environment <
//! explicit CLI/programmatic call. Each apply step only overwrites
//! fields the layer actually set and records which layer won.

use camino::Utf8PathBuf;
use foundrydata_coverage::Profile;

use crate::model::{Compat, ConfigSource, CoverageMode, PipelineOptions};
use crate::sources::{self, EnvConfig, FileConfig};
use crate::validation;
use foundrydata_utils::error::ConfigError;

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    options: PipelineOptions,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self { options: PipelineOptions::default() }
    }
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mark(&mut self, field: &str, source: ConfigSource) {
        self.options.source_attribution.insert(field.to_string(), source);
    }

    /// Apply a parsed `foundrydata.toml`. Only fields present in the file
    /// override the current value.
    pub fn with_file(mut self, file: FileConfig) -> Result<Self, ConfigError> {
        let d = file.defaults;
        if let Some(count) = d.count {
            self.options.count = count;
            self.mark("count", ConfigSource::File);
        }
        if let Some(seed) = d.seed {
            self.options.seed = seed;
            self.mark("seed", ConfigSource::File);
        }
        if let Some(attempts) = d.repair_attempts {
            self.options.repair_attempts = attempts;
            self.mark("repairAttempts", ConfigSource::File);
        }
        if let Some(compat) = d.compat {
            self.options.compat = sources::parse_compat(&compat)?;
            self.mark("compat", ConfigSource::File);
        }
        if let Some(resolve_externals) = d.resolve_externals {
            self.options.resolve_externals = resolve_externals;
            self.mark("resolveExternals", ConfigSource::File);
        }
        if let Some(print_metrics) = d.print_metrics {
            self.options.print_metrics = print_metrics;
        }

        let c = file.coverage;
        let mut touched_coverage = false;
        if let Some(mode) = c.mode {
            self.options.coverage.mode = sources::parse_coverage_mode(&mode)?;
            touched_coverage = true;
        }
        if let Some(dims) = c.dimensions {
            let joined = dims.join(",");
            self.options.coverage.dimensions = sources::parse_dimensions(&joined)?;
            touched_coverage = true;
        }
        if let Some(profile) = c.profile {
            self.options.coverage.profile = Some(sources::parse_profile(&profile)?);
            touched_coverage = true;
        }
        if let Some(min) = c.min {
            self.options.coverage.min = Some(min);
            touched_coverage = true;
        }
        if let Some(report) = c.report {
            self.options.coverage.report_path = Some(Utf8PathBuf::from(report));
            touched_coverage = true;
        }
        if let Some(report_mode) = c.report_mode {
            self.options.coverage.report_mode = sources::parse_report_mode(&report_mode)?;
            touched_coverage = true;
        }
        if touched_coverage {
            self.mark("coverage", ConfigSource::File);
        }
        Ok(self)
    }

    /// Apply `FOUNDRYDATA_*` environment variables.
    pub fn with_env(mut self, env: EnvConfig) -> Result<Self, ConfigError> {
        if let Some(count) = env.count {
            self.options.count = count;
            self.mark("count", ConfigSource::Env);
        }
        if let Some(seed) = env.seed {
            self.options.seed = seed;
            self.mark("seed", ConfigSource::Env);
        }
        if let Some(attempts) = env.repair_attempts {
            self.options.repair_attempts = attempts;
            self.mark("repairAttempts", ConfigSource::Env);
        }
        if let Some(compat) = env.compat {
            self.options.compat = sources::parse_compat(&compat)?;
            self.mark("compat", ConfigSource::Env);
        }
        if let Some(resolve_externals) = env.resolve_externals {
            self.options.resolve_externals = resolve_externals;
            self.mark("resolveExternals", ConfigSource::Env);
        }
        if let Some(print_metrics) = env.print_metrics {
            self.options.print_metrics = print_metrics;
        }

        let mut touched_coverage = false;
        if let Some(mode) = env.coverage_mode {
            self.options.coverage.mode = sources::parse_coverage_mode(&mode)?;
            touched_coverage = true;
        }
        if let Some(dims) = env.coverage_dimensions {
            self.options.coverage.dimensions = sources::parse_dimensions(&dims)?;
            touched_coverage = true;
        }
        if let Some(profile) = env.coverage_profile {
            self.options.coverage.profile = Some(sources::parse_profile(&profile)?);
            touched_coverage = true;
        }
        if let Some(min) = env.coverage_min {
            self.options.coverage.min = Some(min);
            touched_coverage = true;
        }
        if touched_coverage {
            self.mark("coverage", ConfigSource::Env);
        }
        Ok(self)
    }

    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.options.count = count;
        self.mark("count", ConfigSource::Cli);
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u32) -> Self {
        self.options.seed = seed;
        self.mark("seed", ConfigSource::Cli);
        self
    }

    #[must_use]
    pub fn repair_attempts(mut self, attempts: u8) -> Self {
        self.options.repair_attempts = attempts;
        self.mark("repairAttempts", ConfigSource::Cli);
        self
    }

    #[must_use]
    pub fn compat(mut self, compat: Compat) -> Self {
        self.options.compat = compat;
        self.mark("compat", ConfigSource::Cli);
        self
    }

    #[must_use]
    pub fn resolve_externals(mut self, resolve_externals: bool) -> Self {
        self.options.resolve_externals = resolve_externals;
        self.mark("resolveExternals", ConfigSource::Cli);
        self
    }

    #[must_use]
    pub fn print_metrics(mut self, print_metrics: bool) -> Self {
        self.options.print_metrics = print_metrics;
        self
    }

    #[must_use]
    pub fn coverage_mode(mut self, mode: CoverageMode) -> Self {
        self.options.coverage.mode = mode;
        self.mark("coverage", ConfigSource::Cli);
        self
    }

    #[must_use]
    pub fn coverage_dimensions(mut self, dimensions: Vec<foundrydata_coverage::CoverageDimension>) -> Self {
        self.options.coverage.dimensions = dimensions;
        self.mark("coverage", ConfigSource::Cli);
        self
    }

    #[must_use]
    pub fn coverage_profile(mut self, profile: Profile) -> Self {
        self.options.coverage.profile = Some(profile);
        self.mark("coverage", ConfigSource::Cli);
        self
    }

    #[must_use]
    pub fn coverage_min(mut self, min: f64) -> Self {
        self.options.coverage.min = Some(min);
        self.mark("coverage", ConfigSource::Cli);
        self
    }

    #[must_use]
    pub fn coverage_report_path(mut self, path: Utf8PathBuf) -> Self {
        self.options.coverage.report_path = Some(path);
        self.mark("coverage", ConfigSource::Cli);
        self
    }

    #[must_use]
    pub fn coverage_report_mode(mut self, mode: foundrydata_coverage::ReportMode) -> Self {
        self.options.coverage.report_mode = mode;
        self.mark("coverage", ConfigSource::Cli);
        self
    }

    pub fn build(self) -> Result<PipelineOptions, ConfigError> {
        validation::validate(&self.options)?;
        Ok(self.options)
    }
}
