//! Range/shape checks applied after every layer has merged, independent
//! of which layer a value came from (§2.3, §7 fail-fast "cli-args"
//! category).

pub use foundrydata_utils::error::ConfigError;

use crate::model::PipelineOptions;

/// Validate a fully-merged [`PipelineOptions`]. Called once, after the
/// builder has applied defaults/file/env/CLI in precedence order —
/// individual layers are allowed to carry out-of-range values
/// transiently (e.g. a file that sets `repair-attempts = 9` while a CLI
/// flag is about to override it); only the merged result must be valid.
pub fn validate(options: &PipelineOptions) -> Result<(), ConfigError> {
    if !(1..=3).contains(&options.repair_attempts) {
        return Err(ConfigError::InvalidRepairAttempts(options.repair_attempts));
    }
    if options.count == 0 {
        return Err(ConfigError::InvalidValue {
            key: "count".to_string(),
            value: "0".to_string(),
        });
    }
    if let Some(min) = options.coverage.min {
        if !(0.0..=1.0).contains(&min) {
            return Err(ConfigError::InvalidCoverageMin(min));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        assert!(validate(&PipelineOptions::default()).is_ok());
    }

    #[test]
    fn out_of_range_repair_attempts_is_rejected() {
        let mut options = PipelineOptions::default();
        options.repair_attempts = 9;
        assert!(matches!(validate(&options), Err(ConfigError::InvalidRepairAttempts(9))));
    }

    #[test]
    fn coverage_min_outside_unit_interval_is_rejected() {
        let mut options = PipelineOptions::default();
        options.coverage.min = Some(1.5);
        assert!(matches!(validate(&options), Err(ConfigError::InvalidCoverageMin(_))));
    }

    #[test]
    fn zero_count_is_rejected() {
        let mut options = PipelineOptions::default();
        options.count = 0;
        assert!(validate(&options).is_err());
    }
}
