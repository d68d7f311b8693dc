//! Name enumeration for `propertyNames`-constrained objects.
//!
//! Patterns the lifting classifier proves `strict/*` for are enumerated
//! exactly by walking their literal/class structure (equivalent to a
//! subset-constructed DFA's state count, since every state in a
//! finite alternation-of-literals or bounded-class-quantified pattern
//! corresponds 1:1 to a prefix of an emitted name). Anything else falls
//! back to bounded BFS/beam search against the compiled pattern, which
//! is the fallback this component names explicitly when automaton
//! construction is not worth the cost.

use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};
use regex_syntax::hir::{Hir, HirKind};
use regex_syntax::Parser;

/// Default cap on the number of automaton states (or, for the literal
/// structural walk, the equivalent prefix count) explored before giving
/// up and emitting `NAME_AUTOMATON_COMPLEXITY_CAPPED`.
pub const DEFAULT_STATE_CAP: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEnumerationResult {
    pub names: Vec<String>,
    pub capped: bool,
}

/// Enumerate every name accepted by an anchored alternation-of-literals
/// or simple-class-quantified pattern, bounded by `state_cap`.
///
/// Returns `Ok(None)` when `hir` is not one of the structurally-finite
/// shapes this function understands — callers fall back to
/// [`enumerate_names_bfs`] in that case.
#[must_use]
pub fn enumerate_from_structure(hir: &Hir, state_cap: usize) -> Option<NameEnumerationResult> {
    let mut states = 0usize;
    let mut capped = false;
    let names = expand(hir, state_cap, &mut states, &mut capped)?;
    Some(NameEnumerationResult { names, capped })
}

fn expand(hir: &Hir, state_cap: usize, states: &mut usize, capped: &mut bool) -> Option<Vec<String>> {
    if *states > state_cap {
        *capped = true;
        return Some(Vec::new());
    }
    match hir.kind() {
        HirKind::Empty => Some(vec![String::new()]),
        // Anchors are zero-width: contribute nothing, so `^...$` doesn't
        // block structural expansion of the pattern between them.
        HirKind::Look(_) => Some(vec![String::new()]),
        HirKind::Literal(lit) => {
            *states += 1;
            Some(vec![String::from_utf8_lossy(&lit.0).into_owned()])
        }
        HirKind::Class(class) => {
            let mut out = Vec::new();
            if let regex_syntax::hir::Class::Unicode(u) = class {
                for range in u.ranges() {
                    for c in range.start()..=range.end() {
                        *states += 1;
                        if *states > state_cap {
                            *capped = true;
                            return Some(out);
                        }
                        out.push(c.to_string());
                    }
                }
            } else {
                return None;
            }
            Some(out)
        }
        HirKind::Alternation(branches) => {
            let mut out = Vec::new();
            for branch in branches {
                let expanded = expand(branch, state_cap, states, capped)?;
                out.extend(expanded);
                if *capped {
                    break;
                }
            }
            Some(out)
        }
        HirKind::Concat(parts) => {
            let mut acc = vec![String::new()];
            for part in parts {
                let options = expand(part, state_cap, states, capped)?;
                let mut next = Vec::with_capacity(acc.len() * options.len().max(1));
                'outer: for prefix in &acc {
                    for suffix in &options {
                        next.push(format!("{prefix}{suffix}"));
                        if next.len() > state_cap {
                            *capped = true;
                            break 'outer;
                        }
                    }
                }
                acc = next;
                if *capped {
                    break;
                }
            }
            Some(acc)
        }
        HirKind::Repetition(rep) => {
            let max = rep.max?;
            if max as usize > crate::lifting::MAX_LIFTED_QUANTIFIER as usize {
                return None;
            }
            let options = expand(&rep.sub, state_cap, states, capped)?;
            // prefixes[k] holds every string formed by exactly k repetitions.
            let mut prefixes = vec![String::new()];
            let mut out = Vec::new();
            for count in 0..=max {
                if count >= rep.min {
                    out.extend(prefixes.iter().cloned());
                }
                if out.len() > state_cap {
                    *capped = true;
                    break;
                }
                if count < max {
                    let mut next = Vec::with_capacity(prefixes.len() * options.len().max(1));
                    for prefix in &prefixes {
                        for suffix in &options {
                            next.push(format!("{prefix}{suffix}"));
                        }
                    }
                    prefixes = next;
                }
            }
            Some(out)
        }
        _ => None,
    }
}

/// Parse `source` and enumerate names, exactly when the structure is
/// finite, else via bounded BFS against the compiled pattern over
/// `alphabet` up to `max_length`/`max_candidates`.
pub fn enumerate_names(
    source: &str,
    alphabet: &str,
    max_length: usize,
    max_candidates: usize,
    canon_path: &str,
) -> Result<NameEnumerationResult, Envelope> {
    let hir = Parser::new().parse(source).map_err(|e| {
        Envelope::new(
            DiagnosticCode::RegexCompileError,
            canon_path.to_string(),
            Phase::Compose,
            Some(serde_json::json!({"pattern": source, "message": e.to_string()})),
        )
        .expect("details never shadow canonPath")
    })?;

    if let Some(result) = enumerate_from_structure(&hir, DEFAULT_STATE_CAP) {
        if !result.capped {
            return Ok(result);
        }
    }

    let regex = regex::Regex::new(source).map_err(|e| {
        Envelope::new(
            DiagnosticCode::RegexCompileError,
            canon_path.to_string(),
            Phase::Compose,
            Some(serde_json::json!({"pattern": source, "message": e.to_string()})),
        )
        .expect("details never shadow canonPath")
    })?;
    Ok(enumerate_names_bfs(&regex, alphabet, max_length, max_candidates))
}

/// Bounded breadth-first search over `alphabet^k` for `k` up to
/// `max_length`, returning every matching string found before
/// `max_candidates` is exhausted. This is the fallback named for
/// patterns the structural walk cannot enumerate exactly.
#[must_use]
pub fn enumerate_names_bfs(
    regex: &regex::Regex,
    alphabet: &str,
    max_length: usize,
    max_candidates: usize,
) -> NameEnumerationResult {
    let alphabet: Vec<char> = alphabet.chars().collect();
    let mut frontier = vec![String::new()];
    let mut found = Vec::new();
    let mut capped = false;

    for _ in 0..=max_length {
        let mut next_frontier = Vec::new();
        for candidate in &frontier {
            if regex.is_match(candidate) {
                found.push(candidate.clone());
                if found.len() >= max_candidates {
                    capped = true;
                    break;
                }
            }
            for &c in &alphabet {
                let mut extended = candidate.clone();
                extended.push(c);
                next_frontier.push(extended);
            }
        }
        if capped {
            break;
        }
        frontier = next_frontier;
    }
    NameEnumerationResult {
        names: found,
        capped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_alternation_of_literals_exactly() {
        let result = enumerate_names(
            "^(?:foo|bar)$",
            "fobar",
            3,
            16,
            "/patternProperties/^(?:foo|bar)$",
        )
        .unwrap();
        assert!(!result.capped);
        let mut names = result.names;
        names.sort();
        assert_eq!(names, vec!["bar".to_string(), "foo".to_string()]);
    }

    #[test]
    fn bfs_fallback_finds_matches_within_budget() {
        let regex = regex::Regex::new("^(ab)+$").unwrap();
        let result = enumerate_names_bfs(&regex, "ab", 4, 10);
        assert!(result.names.contains(&"ab".to_string()));
        assert!(result.names.contains(&"abab".to_string()));
    }

    #[test]
    fn bfs_fallback_respects_candidate_cap() {
        let regex = regex::Regex::new("^[a-z]$").unwrap();
        let result = enumerate_names_bfs(&regex, "abcdefghij", 1, 3);
        assert!(result.capped);
        assert_eq!(result.names.len(), 3);
    }
}
