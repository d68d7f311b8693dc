use regex_syntax::hir::{Hir, HirKind, Literal, Repetition};
use regex_syntax::Parser;

use crate::complexity::{compute_regex_complexity, DEFAULT_MAX_COMPLEXITY};
use crate::scan::scan_regex_source;

/// Bound on a lifted quantified class/group's repetition count.
pub const MAX_LIFTED_QUANTIFIER: u32 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchoredLiftingDecision {
    StrictAlternationOfLiterals,
    StrictSimpleClassQuantified,
    Substring,
    NotSimpleEnough,
    LookaroundOrBackref,
    ComplexityCap,
    CompileError,
}

/// Classify `source` for property-name enumeration lifting. Does not
/// mutate or compile anything beyond the checks needed to classify — the
/// composer decides what to do with the classification.
#[must_use]
pub fn decide_anchored_subset_lifting(
    source: &str,
    max_complexity: usize,
) -> AnchoredLiftingDecision {
    let scan = scan_regex_source(source);
    if scan.has_look_around || scan.has_back_reference {
        return AnchoredLiftingDecision::LookaroundOrBackref;
    }

    let complexity = compute_regex_complexity(source);
    if complexity.complexity_score > max_complexity {
        return AnchoredLiftingDecision::ComplexityCap;
    }

    let hir = match Parser::new().parse(source) {
        Ok(hir) => hir,
        Err(_) => return AnchoredLiftingDecision::CompileError,
    };

    if !(scan.anchored_start && scan.anchored_end) {
        return AnchoredLiftingDecision::Substring;
    }

    let inner = strip_anchors(&hir);
    if is_alternation_of_literals(&inner) {
        return AnchoredLiftingDecision::StrictAlternationOfLiterals;
    }
    if is_simple_class_quantified_concat(&inner) {
        return AnchoredLiftingDecision::StrictSimpleClassQuantified;
    }
    AnchoredLiftingDecision::NotSimpleEnough
}

/// Run the default complexity bound (§4.4, 512).
#[must_use]
pub fn decide_anchored_subset_lifting_default(source: &str) -> AnchoredLiftingDecision {
    decide_anchored_subset_lifting(source, DEFAULT_MAX_COMPLEXITY)
}

fn strip_anchors(hir: &Hir) -> Hir {
    match hir.kind() {
        HirKind::Concat(parts) => {
            let filtered: Vec<Hir> = parts
                .iter()
                .filter(|p| !matches!(p.kind(), HirKind::Look(_)))
                .cloned()
                .collect();
            if filtered.len() == 1 {
                filtered.into_iter().next().unwrap()
            } else {
                Hir::concat(filtered)
            }
        }
        _ => hir.clone(),
    }
}

fn is_alternation_of_literals(hir: &Hir) -> bool {
    match hir.kind() {
        HirKind::Literal(_) => true,
        HirKind::Alternation(branches) => branches.iter().all(branch_is_literal),
        _ => false,
    }
}

fn branch_is_literal(hir: &Hir) -> bool {
    match hir.kind() {
        HirKind::Literal(_) => true,
        HirKind::Concat(parts) => parts.iter().all(|p| matches!(p.kind(), HirKind::Literal(_))),
        HirKind::Empty => true,
        _ => false,
    }
}

fn is_simple_class_quantified_concat(hir: &Hir) -> bool {
    match hir.kind() {
        HirKind::Class(_) | HirKind::Literal(Literal(_)) => true,
        HirKind::Repetition(rep) => is_bounded_simple_repetition(rep),
        HirKind::Concat(parts) => parts.iter().all(is_simple_class_quantified_concat),
        _ => false,
    }
}

fn is_bounded_simple_repetition(rep: &Repetition) -> bool {
    let within_bound = rep.max.is_some_and(|max| max <= MAX_LIFTED_QUANTIFIER);
    within_bound
        && matches!(
            rep.sub.kind(),
            HirKind::Class(_) | HirKind::Literal(_)
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_alternation_of_literals() {
        let decision = decide_anchored_subset_lifting_default("^(?:foo|bar|baz)$");
        assert_eq!(decision, AnchoredLiftingDecision::StrictAlternationOfLiterals);
    }

    #[test]
    fn classifies_simple_class_quantified() {
        let decision = decide_anchored_subset_lifting_default("^[a-z]{2,4}$");
        assert_eq!(decision, AnchoredLiftingDecision::StrictSimpleClassQuantified);
    }

    #[test]
    fn classifies_unanchored_as_substring() {
        let decision = decide_anchored_subset_lifting_default("foo");
        assert_eq!(decision, AnchoredLiftingDecision::Substring);
    }

    #[test]
    fn classifies_lookaround() {
        let decision = decide_anchored_subset_lifting_default("^(?=foo)bar$");
        assert_eq!(decision, AnchoredLiftingDecision::LookaroundOrBackref);
    }

    #[test]
    fn classifies_unbounded_quantifier_as_not_simple_enough() {
        let decision = decide_anchored_subset_lifting_default("^[a-z]*(ab)+$");
        assert_eq!(decision, AnchoredLiftingDecision::NotSimpleEnough);
    }

    #[test]
    fn classifies_compile_error() {
        let decision = decide_anchored_subset_lifting_default("^(unclosed$");
        assert_eq!(decision, AnchoredLiftingDecision::CompileError);
    }
}
