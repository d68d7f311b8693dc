//! The closed diagnostic code enumeration.
//!
//! Every code a phase is allowed to emit is a variant here. There is no
//! open-ended "other" bucket: a phase that wants to report something new
//! adds a variant, not a string.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Normalizer
    DefsTargetMissing,
    ExternalRefUnresolved,
    DynamicScopeBounded,

    // Composer: UNSAT reasoning
    UnsatRequiredApFalse,
    UnsatRequiredPnames,
    UnsatRequiredVsPropertynames,
    UnsatMinpropertiesVsCoverage,
    UnsatMinpropsPnames,
    UnsatPatternPnames,
    UnsatNumericBounds,
    UnsatApFalseEmptyCoverage,
    UnsatBudgetExhausted,
    ContainsNeedMinGtMax,
    ContainsUnsatBySum,
    ApFalseUnsafePattern,

    // Composer / regex: complexity caps
    ComplexityCapPatterns,
    RegexCompileError,
    RegexComplexityCapped,
    NameAutomatonComplexityCapped,
    SolverTimeout,

    // Generator / repair
    RepairPnamesPatternEnum,
    RepairEvalGuardFail,

    // Validator
    AjvFlagsMismatch,
    ValidationCompileError,
    SchemaInternalRefMissing,

    // Resolver
    ResolverAddSchemaSkippedIncompatibleDialect,

    // Coverage threshold (surfaced at the orchestrator/CLI boundary)
    CoverageThresholdNotMet,
}

impl DiagnosticCode {
    /// The phase a diagnostic of this code is always emitted from, when the
    /// code is intrinsic to one phase. Codes that can be raised from more
    /// than one context (complexity caps, solver timeout) return `None`;
    /// the emitting phase is then recorded on the envelope directly.
    #[must_use]
    pub fn home_phase(self) -> Option<super::Phase> {
        use super::Phase;
        match self {
            Self::DefsTargetMissing | Self::ExternalRefUnresolved | Self::DynamicScopeBounded => {
                Some(Phase::Normalize)
            }
            Self::UnsatRequiredApFalse
            | Self::UnsatRequiredPnames
            | Self::UnsatRequiredVsPropertynames
            | Self::UnsatMinpropertiesVsCoverage
            | Self::UnsatMinpropsPnames
            | Self::UnsatPatternPnames
            | Self::UnsatNumericBounds
            | Self::UnsatApFalseEmptyCoverage
            | Self::UnsatBudgetExhausted
            | Self::ContainsNeedMinGtMax
            | Self::ContainsUnsatBySum
            | Self::ApFalseUnsafePattern => Some(Phase::Compose),
            Self::RepairPnamesPatternEnum | Self::RepairEvalGuardFail => Some(Phase::Repair),
            Self::AjvFlagsMismatch
            | Self::ValidationCompileError
            | Self::SchemaInternalRefMissing => Some(Phase::Validate),
            Self::ComplexityCapPatterns
            | Self::RegexCompileError
            | Self::RegexComplexityCapped
            | Self::NameAutomatonComplexityCapped
            | Self::SolverTimeout
            | Self::ResolverAddSchemaSkippedIncompatibleDialect
            | Self::CoverageThresholdNotMet => None,
        }
    }

    /// Whether this code always indicates a fatal, downstream-skipping
    /// condition (the composer's UNSAT family).
    #[must_use]
    pub fn is_fatal_unsat(self) -> bool {
        matches!(
            self,
            Self::UnsatRequiredApFalse
                | Self::UnsatRequiredPnames
                | Self::UnsatRequiredVsPropertynames
                | Self::UnsatMinpropertiesVsCoverage
                | Self::UnsatMinpropsPnames
                | Self::UnsatPatternPnames
                | Self::UnsatNumericBounds
                | Self::UnsatApFalseEmptyCoverage
                | Self::UnsatBudgetExhausted
                | Self::ContainsNeedMinGtMax
                | Self::ContainsUnsatBySum
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_from_str() {
        for code in [
            DiagnosticCode::UnsatRequiredVsPropertynames,
            DiagnosticCode::RegexComplexityCapped,
            DiagnosticCode::CoverageThresholdNotMet,
        ] {
            let s = code.to_string();
            let parsed: DiagnosticCode = s.parse().unwrap();
            assert_eq!(parsed, code);
        }
    }

    #[test]
    fn unsat_family_is_fatal() {
        assert!(DiagnosticCode::UnsatRequiredPnames.is_fatal_unsat());
        assert!(!DiagnosticCode::RegexComplexityCapped.is_fatal_unsat());
    }
}
