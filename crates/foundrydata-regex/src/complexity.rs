use serde::{Deserialize, Serialize};

/// Default bound an anchored-safe pattern's complexity score must stay
/// under.
pub const DEFAULT_MAX_COMPLEXITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexComplexity {
    pub complexity_score: usize,
    pub quantified_groups: usize,
}

/// `complexityScore = length + quantifiedGroups`, where a "quantified
/// group" is a group or character class immediately followed by a
/// repetition operator (`*`, `+`, `?`, or a bounded `{m,n}`).
#[must_use]
pub fn compute_regex_complexity(source: &str) -> RegexComplexity {
    let bytes = source.as_bytes();
    let mut quantified_groups = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b')' | b']' => {
                if let Some(&next) = bytes.get(i + 1) {
                    if matches!(next, b'*' | b'+' | b'?') || next == b'{' {
                        quantified_groups += 1;
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    RegexComplexity {
        complexity_score: source.chars().count() + quantified_groups,
        quantified_groups,
    }
}
