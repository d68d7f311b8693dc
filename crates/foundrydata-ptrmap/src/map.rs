use std::collections::BTreeMap;

use crate::CanonPointer;

/// Bidirectional mapping between canonical pointers (into the normalized
/// schema) and original pointers (into the user-supplied schema).
///
/// One original pointer may map to several canonical pointers — e.g. a
/// `propertyNames.enum` rewrite produces both a `patternProperties` entry
/// and an `additionalProperties` entry from the same original location —
/// so the reverse index is `original -> Vec<canonical>`, not a 1:1 map.
#[derive(Debug, Clone, Default)]
pub struct PtrMap {
    forward: BTreeMap<CanonPointer, CanonPointer>,
    reverse: BTreeMap<CanonPointer, Vec<CanonPointer>>,
}

impl PtrMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `canonical` was derived from `original`. Idempotent:
    /// inserting the same pair twice does not duplicate the reverse entry.
    pub fn insert(&mut self, canonical: CanonPointer, original: CanonPointer) {
        self.forward.insert(canonical.clone(), original.clone());
        let bucket = self.reverse.entry(original).or_default();
        if !bucket.contains(&canonical) {
            bucket.push(canonical);
        }
    }

    #[must_use]
    pub fn original_of(&self, canonical: &CanonPointer) -> Option<&CanonPointer> {
        self.forward.get(canonical)
    }

    #[must_use]
    pub fn canonicals_of(&self, original: &CanonPointer) -> &[CanonPointer] {
        self.reverse
            .get(original)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Every canonical pointer in `reachable` must have a forward entry,
    /// and that entry's reverse bucket must contain the canonical pointer
    /// back. This is the ptrMap completeness invariant; it does not by
    /// itself prove `reachable` was computed correctly from the schema.
    #[must_use]
    pub fn is_complete_for(&self, reachable: &[CanonPointer]) -> bool {
        reachable.iter().all(|canonical| match self.original_of(canonical) {
            Some(original) => self.canonicals_of(original).contains(canonical),
            None => false,
        })
    }
}
