//! Coerces a string value into a witness of a `pattern` the regex
//! lifting classifier proves structurally finite (§4.6). Only
//! `strict/alternationOfLiterals` and `strict/simpleClassQuantified`
//! patterns are eligible; anything else is not a safe coercion and the
//! caller should fall back to surrendering that edit.

use foundrydata_regex::automaton::enumerate_from_structure;
use foundrydata_regex::{decide_anchored_subset_lifting_default, AnchoredLiftingDecision};
use regex_syntax::Parser;

/// Returns the witness string closest in length to `current`, breaking
/// ties toward the lexicographically first, so the choice is
/// deterministic regardless of iteration order.
#[must_use]
pub fn coerce_to_pattern_witness(pattern: &str, current: &str) -> Option<String> {
    let decision = decide_anchored_subset_lifting_default(pattern);
    if !matches!(
        decision,
        AnchoredLiftingDecision::StrictAlternationOfLiterals | AnchoredLiftingDecision::StrictSimpleClassQuantified
    ) {
        return None;
    }
    let hir = Parser::new().parse(pattern).ok()?;
    let result = enumerate_from_structure(&hir, foundrydata_regex::automaton::DEFAULT_STATE_CAP)?;
    if result.capped || result.names.is_empty() {
        return None;
    }
    let mut names = result.names;
    names.sort();
    names.into_iter().min_by_key(|n| (n.chars().count() as i64 - current.chars().count() as i64).unsigned_abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_witness_closest_in_length() {
        let witness = coerce_to_pattern_witness("^(?:a|bb|ccc)$", "xy").unwrap();
        assert_eq!(witness, "bb");
    }

    #[test]
    fn unliftable_pattern_returns_none() {
        assert!(coerce_to_pattern_witness("^[a-z]+$", "abc").is_none());
    }
}
