//! Per-node enumerator of admissible property names under
//! `additionalProperties:false` (§2 component 5, §4.3 "AP:false
//! coverage"). `has(name)` is always computable from declared properties
//! and pattern membership; `enumerate()` only succeeds when every
//! `patternProperties` pattern on the node was proven structurally
//! finite by the regex lifting classifier.

use std::collections::{BTreeMap, BTreeSet};

use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};
use foundrydata_regex::{
    automaton::enumerate_from_structure, decide_anchored_subset_lifting_default, AnchoredLiftingDecision,
};
use regex_syntax::Parser;

#[derive(Debug, Clone, Default)]
struct ApFalseNode {
    declared: BTreeSet<String>,
    patterns: Vec<regex::Regex>,
    finite_names: Option<BTreeSet<String>>,
}

/// The AP:false coverage index for one composed schema. Keyed by the
/// canonical pointer of the object node it describes.
#[derive(Debug, Clone, Default)]
pub struct CoverageIndex {
    nodes: BTreeMap<String, ApFalseNode>,
}

impl CoverageIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an AP:false object node found at `canon_path`, with its
    /// declared `properties` keys and raw `patternProperties` pattern
    /// sources. Returns any `COMPLEXITY_CAP_PATTERNS` diagnostics raised
    /// while attempting to prove finiteness.
    pub fn register(
        &mut self,
        canon_path: &str,
        declared: impl IntoIterator<Item = String>,
        pattern_sources: &[String],
    ) -> Vec<Envelope> {
        let mut diagnostics = Vec::new();
        let declared: BTreeSet<String> = declared.into_iter().collect();
        let mut patterns = Vec::new();
        let mut finite_names: Option<BTreeSet<String>> = Some(declared.clone());

        for source in pattern_sources {
            if let Ok(re) = regex::Regex::new(source) {
                patterns.push(re);
            }
            match decide_anchored_subset_lifting_default(source) {
                AnchoredLiftingDecision::StrictAlternationOfLiterals
                | AnchoredLiftingDecision::StrictSimpleClassQuantified => {
                    if let Ok(hir) = Parser::new().parse(source) {
                        if let Some(result) = enumerate_from_structure(&hir, foundrydata_regex::automaton::DEFAULT_STATE_CAP) {
                            if result.capped {
                                finite_names = None;
                                diagnostics.push(Envelope::new(
                                    DiagnosticCode::ComplexityCapPatterns,
                                    canon_path.to_string(),
                                    Phase::Compose,
                                    Some(serde_json::json!({"reason": "witnessDomainExhausted", "pattern": source})),
                                ).expect("details never shadow canonPath"));
                            } else if let Some(set) = &mut finite_names {
                                set.extend(result.names);
                            }
                        } else {
                            finite_names = None;
                        }
                    } else {
                        finite_names = None;
                    }
                }
                _ => {
                    finite_names = None;
                }
            }
        }

        self.nodes.insert(
            canon_path.to_string(),
            ApFalseNode {
                declared,
                patterns,
                finite_names,
            },
        );
        diagnostics
    }

    /// Whether `name` is admissible at the AP:false node `canon_path`.
    /// Always decidable, regardless of finiteness.
    #[must_use]
    pub fn has(&self, canon_path: &str, name: &str) -> bool {
        match self.nodes.get(canon_path) {
            Some(node) => {
                node.declared.contains(name) || node.patterns.iter().any(|p| p.is_match(name))
            }
            None => true,
        }
    }

    /// The exact admissible name set for `canon_path`, when its
    /// finiteness was proven; `None` when only `has()` is decidable.
    #[must_use]
    pub fn enumerate(&self, canon_path: &str) -> Option<Vec<String>> {
        self.nodes
            .get(canon_path)?
            .finite_names
            .as_ref()
            .map(|set| set.iter().cloned().collect())
    }

    #[must_use]
    pub fn is_registered(&self, canon_path: &str) -> bool {
        self.nodes.contains_key(canon_path)
    }
}
