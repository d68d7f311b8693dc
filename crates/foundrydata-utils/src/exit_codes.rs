//! Exit code constants and error mapping for the `foundrydata` CLI.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Run completed, all items validated (or validation skipped deliberately) |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `SCHEMA_UNSAT` | Composer proved the schema infeasible |
//! | 4 | `VALIDATION_FAILED` | One or more generated items failed oracle validation |
//! | 5 | `COVERAGE_THRESHOLD_NOT_MET` | `coverage-min` was configured and not met |
//! | 65 | `SCHEMA_BUG` | Fail-fast: unsafe pattern, missing $ref, oracle compile error |

use crate::error::{FailureCategory, FoundryError};

/// Stable, documented process exit code.
///
/// Numeric values are part of the public API and will not change within a
/// 0.x minor series without a changelog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const INTERNAL: ExitCode = ExitCode(1);
    pub const CLI_ARGS: ExitCode = ExitCode(2);
    pub const SCHEMA_UNSAT: ExitCode = ExitCode(3);
    pub const VALIDATION_FAILED: ExitCode = ExitCode(4);
    pub const COVERAGE_THRESHOLD_NOT_MET: ExitCode = ExitCode(5);
    pub const SCHEMA_BUG: ExitCode = ExitCode(65);

    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl From<&FoundryError> for ExitCode {
    fn from(err: &FoundryError) -> Self {
        match err.failure_category() {
            FailureCategory::CliArgs => ExitCode::CLI_ARGS,
            FailureCategory::SchemaBug => ExitCode::SCHEMA_BUG,
            FailureCategory::AjvConfig => ExitCode::SCHEMA_BUG,
            FailureCategory::Io | FailureCategory::Internal => ExitCode::INTERNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn exit_code_constants_match_documented_values() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::SCHEMA_UNSAT.as_i32(), 3);
        assert_eq!(ExitCode::VALIDATION_FAILED.as_i32(), 4);
        assert_eq!(ExitCode::COVERAGE_THRESHOLD_NOT_MET.as_i32(), 5);
        assert_eq!(ExitCode::SCHEMA_BUG.as_i32(), 65);
    }

    #[test]
    fn config_error_maps_to_cli_args() {
        let err = FoundryError::Config(ConfigError::InvalidCoverageMin(2.0));
        assert_eq!(ExitCode::from(&err), ExitCode::CLI_ARGS);
    }

    #[test]
    fn round_trips_through_i32() {
        let code: ExitCode = 5.into();
        let back: i32 = code.into();
        assert_eq!(back, 5);
    }
}
