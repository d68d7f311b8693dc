//! Regex classification, complexity scoring, and name enumeration for
//! `patternProperties`/`propertyNames` constraints.

pub mod automaton;
pub mod complexity;
pub mod lifting;
pub mod scan;

pub use automaton::{enumerate_from_structure, enumerate_names, enumerate_names_bfs, NameEnumerationResult};
pub use complexity::{compute_regex_complexity, RegexComplexity, DEFAULT_MAX_COMPLEXITY};
pub use lifting::{decide_anchored_subset_lifting, decide_anchored_subset_lifting_default, AnchoredLiftingDecision};
pub use scan::{scan_regex_source, try_compile, RegexError, RegexScan};

/// A pattern is anchored-safe iff it compiles, is fully anchored, uses
/// neither lookaround nor backreferences, and its complexity score stays
/// within `max_complexity` (default 512, see [`DEFAULT_MAX_COMPLEXITY`]).
#[must_use]
pub fn is_anchored_safe(source: &str, max_complexity: usize) -> bool {
    let scan = scan_regex_source(source);
    if scan.has_look_around || scan.has_back_reference {
        return false;
    }
    if !(scan.anchored_start && scan.anchored_end) {
        return false;
    }
    let complexity = compute_regex_complexity(source);
    if complexity.complexity_score > max_complexity {
        return false;
    }
    regex::Regex::new(source).is_ok()
}
