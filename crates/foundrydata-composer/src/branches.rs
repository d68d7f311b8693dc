//! Scores `oneOf`/`anyOf` branches for selection (§4.3 "branch
//! selection"). Composer-level selection is score-only: discriminant
//! presence, least-constrained `required` set, smallest `minProperties`.
//! The generator runs its own reject-sampling trial against the selected
//! branch while constructing an instance, so a full compile+trial step
//! is not duplicated here (`skipTrials` is effectively always on at this
//! layer; see `DESIGN.md`).

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchScore {
    pub index: usize,
    pub score: f64,
    pub has_discriminant: bool,
}

/// A branch "has a discriminant" when it pins at least one property to a
/// single value via `const` or a single-element `enum`, which lets the
/// generator commit to the branch with a cheap, certain write instead of
/// relying on rejection sampling.
fn has_discriminant(branch: &Value) -> bool {
    let Some(properties) = branch.get("properties").and_then(Value::as_object) else {
        return branch.get("const").is_some();
    };
    properties.values().any(|p| {
        p.get("const").is_some() || p.get("enum").and_then(Value::as_array).is_some_and(|a| a.len() == 1)
    })
}

fn required_len(branch: &Value) -> usize {
    branch.get("required").and_then(Value::as_array).map_or(0, Vec::len)
}

fn min_properties(branch: &Value) -> u64 {
    branch.get("minProperties").and_then(Value::as_u64).unwrap_or(0)
}

#[must_use]
pub fn score_branches(branches: &[Value]) -> Vec<BranchScore> {
    branches
        .iter()
        .enumerate()
        .map(|(index, branch)| {
            let discriminant = has_discriminant(branch);
            let score = if discriminant { 1_000.0 } else { 0.0 }
                - required_len(branch) as f64
                - min_properties(branch) as f64;
            BranchScore {
                index,
                score,
                has_discriminant: discriminant,
            }
        })
        .collect()
}

/// Select the highest-scoring branch, breaking ties by the lowest index
/// so selection is deterministic independent of score-comparison order.
#[must_use]
pub fn select_branch(scores: &[BranchScore]) -> usize {
    scores
        .iter()
        .fold(None::<&BranchScore>, |best, candidate| match best {
            Some(b) if b.score >= candidate.score => Some(b),
            _ => Some(candidate),
        })
        .map(|s| s.index)
        .unwrap_or(0)
}
