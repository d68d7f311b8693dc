//! Workspace-wide error taxonomy.
//!
//! `FoundryError` covers only the **fail-fast** category from the error
//! handling design (§7): conditions that abort a phase and terminate the
//! run. Fatal UNSAT, capped completeness, and warn/hint diagnostics are
//! deliberately *not* represented here — they are recorded as
//! `foundrydata_diagnostics::Envelope`s and the run continues or
//! terminates through ordinary control flow, never through `Result::Err`.
//! This mirrors the teacher's split between `XCheckerError` (thrown,
//! fail-fast failures) and structured `ValidationError` lists (returned,
//! expected outcomes).

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a `foundrydata` pipeline run outright.
#[derive(Debug, Error)]
pub enum FoundryError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// `additionalProperties:false` with a pattern/propertyNames combination
    /// the regex analyzer cannot prove safe (anchored, no lookaround/backref).
    #[error("unsafe pattern under additionalProperties:false at {canon_path}: {reason}")]
    ApFalseUnsafePattern { canon_path: String, reason: String },

    /// An external `$ref` could not be resolved and `resolveExternals` was
    /// not requested (or strict mode demanded it).
    #[error("external $ref unresolved: {uri} (referenced from {canon_path})")]
    ExternalRefUnresolved { uri: String, canon_path: String },

    /// A `$ref` internal to the schema pointed at nothing.
    #[error("internal $ref missing: {pointer} (referenced from {canon_path})")]
    SchemaInternalRefMissing {
        pointer: String,
        canon_path: String,
    },

    /// The oracle failed to compile the *original* schema.
    #[error("validator compile error for schema {schema_hash}: {reason}")]
    ValidationCompileError { schema_hash: String, reason: String },

    /// The oracle reported inconsistent dialect/format flags between the
    /// source and planning compilations of the same schema.
    #[error("oracle flags mismatch for instance {instance:?}: {diffs:?}")]
    AjvFlagsMismatch {
        instance: OracleInstanceKind,
        diffs: Vec<String>,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which compiled instance of a schema an `AJV_FLAGS_MISMATCH` concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleInstanceKind {
    Source,
    Planning,
    Both,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config file at {path}: {reason}")]
    InvalidFile { path: PathBuf, reason: String },

    #[error("unknown coverage dimension: {0}")]
    UnknownDimension(String),

    #[error("coverage-min must be in [0, 1], got {0}")]
    InvalidCoverageMin(f64),

    #[error("repair-attempts must be in [1, 3], got {0}")]
    InvalidRepairAttempts(u8),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Coarse failure category, derived from a [`FoundryError`] for reporting.
///
/// This is not the exit code itself (see [`crate::exit_codes`]) — it is
/// the human-facing bucket a presenter groups errors into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureCategory {
    SchemaBug,
    AjvConfig,
    CliArgs,
    Io,
    Internal,
}

impl FoundryError {
    #[must_use]
    pub fn failure_category(&self) -> FailureCategory {
        match self {
            Self::Config(_) => FailureCategory::CliArgs,
            Self::ApFalseUnsafePattern { .. }
            | Self::ExternalRefUnresolved { .. }
            | Self::SchemaInternalRefMissing { .. } => FailureCategory::SchemaBug,
            Self::ValidationCompileError { .. } | Self::AjvFlagsMismatch { .. } => {
                FailureCategory::AjvConfig
            }
            Self::Io { .. } | Self::Json(_) => FailureCategory::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_category_buckets_config_as_cli_args() {
        let err = FoundryError::Config(ConfigError::InvalidCoverageMin(1.5));
        assert_eq!(err.failure_category(), FailureCategory::CliArgs);
    }

    #[test]
    fn failure_category_buckets_unsafe_pattern_as_schema_bug() {
        let err = FoundryError::ApFalseUnsafePattern {
            canon_path: "#/properties/name".into(),
            reason: "unanchored pattern".into(),
        };
        assert_eq!(err.failure_category(), FailureCategory::SchemaBug);
    }

    #[test]
    fn failure_category_buckets_oracle_mismatch_as_ajv_config() {
        let err = FoundryError::AjvFlagsMismatch {
            instance: OracleInstanceKind::Both,
            diffs: vec!["strict".into()],
        };
        assert_eq!(err.failure_category(), FailureCategory::AjvConfig);
    }
}
