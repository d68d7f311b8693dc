//! Generation knobs (§4.5). Every field here participates in the
//! determinism contract: the same `(effective schema, count, seed,
//! planOptions, coverageHints)` must always produce byte-identical output.

use std::collections::BTreeMap;

/// Soft budgets handed to the bounded pattern-witness search (`enumerate_names`'s
/// BFS fallback) when a `patternProperties`/`pattern` constraint isn't
/// structurally finite.
#[derive(Debug, Clone)]
pub struct PatternWitnessOptions {
    pub alphabet: String,
    pub max_length: usize,
    pub max_candidates: usize,
}

impl Default for PatternWitnessOptions {
    fn default() -> Self {
        Self {
            alphabet: "abcdefghijklmnopqrstuvwxyz0123456789".to_string(),
            max_length: 8,
            max_candidates: 64,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub pattern_witness: PatternWitnessOptions,
}

/// A coverage hint steering generation toward a specific branch, enum
/// index, or property-presence decision at a given canonical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageHint {
    PreferBranch(usize),
    EnsurePropertyPresence(String, bool),
    CoverEnumValue(usize),
}

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub count: u32,
    pub seed: u32,
    pub plan_options: PlanOptions,
    pub prefer_examples: bool,
    /// Hints keyed by the canonical path they apply to.
    pub coverage_hints: BTreeMap<String, Vec<CoverageHint>>,
}
