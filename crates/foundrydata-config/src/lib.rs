//! Layered resolution of pipeline and coverage options: built-in
//! defaults, an optional `foundrydata.toml` project file, `FOUNDRYDATA_*`
//! environment variables, and explicit CLI/programmatic overrides, in
//! that increasing order of precedence.

pub mod builder;
pub mod discovery;
pub mod model;
pub mod sources;
pub mod validation;

pub use builder::ConfigBuilder;
pub use model::{Compat, ConfigSource, CoverageMode, CoverageOptions, PipelineOptions};
pub use validation::validate;

use camino::Utf8Path;
use foundrydata_utils::error::ConfigError;

/// Resolve options starting from the project file discovered under
/// `start_dir` (if any) and the process environment, without any
/// CLI/programmatic layer applied yet. Callers that have CLI flags
/// should chain further `ConfigBuilder` calls onto the returned builder
/// before calling [`ConfigBuilder::build`]; this function exists for
/// callers (and tests) that only need the file+env layers.
pub fn resolve_from_environment(start_dir: &Utf8Path) -> Result<ConfigBuilder, ConfigError> {
    let mut config_builder = ConfigBuilder::new();

    if let Some(project_file) = discovery::discover_project_file(start_dir) {
        let contents = std::fs::read_to_string(&project_file).map_err(|err| ConfigError::InvalidFile {
            path: project_file.clone().into_std_path_buf(),
            reason: err.to_string(),
        })?;
        let file_config = sources::parse_file_config(&contents).map_err(|err| match err {
            ConfigError::InvalidFile { reason, .. } => ConfigError::InvalidFile {
                path: project_file.clone().into_std_path_buf(),
                reason,
            },
            other => other,
        })?;
        config_builder = config_builder.with_file(file_config)?;
    }

    config_builder = config_builder.with_env(sources::read_env_config())?;
    Ok(config_builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn resolve_without_project_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let options = resolve_from_environment(&root).unwrap().build().unwrap();
        assert_eq!(options.count, model::DEFAULT_COUNT);
    }

    #[test]
    fn resolve_picks_up_project_file() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        std::fs::write(
            root.join(discovery::PROJECT_FILE_NAME),
            "[defaults]\ncount = 50\n",
        )
        .unwrap();
        let options = resolve_from_environment(&root).unwrap().build().unwrap();
        assert_eq!(options.count, 50);
        assert_eq!(options.source_attribution["count"], ConfigSource::File);
    }
}
