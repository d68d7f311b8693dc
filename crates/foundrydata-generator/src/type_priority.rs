//! Union-type resolution (§4.5): `type:[...]` picks the earliest-ranked
//! type by a fixed priority, independent of the author's declared order.

const PRIORITY: [&str; 7] = ["integer", "number", "string", "boolean", "array", "object", "null"];

/// Rank of `type_name` in the fixed priority order, or `usize::MAX` for an
/// unrecognized type name (sorts last).
#[must_use]
fn rank(type_name: &str) -> usize {
    PRIORITY.iter().position(|t| *t == type_name).unwrap_or(usize::MAX)
}

/// Pick the earliest-ranked type among `types`. Empty input has no
/// sensible answer; callers treat an empty `type` array as "any type",
/// not as a call into this function.
#[must_use]
pub fn pick_type<'a>(types: &[&'a str]) -> Option<&'a str> {
    types.iter().copied().min_by_key(|t| rank(t))
}
