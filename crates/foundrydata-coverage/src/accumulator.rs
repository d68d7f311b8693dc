//! Coverage accumulator (§4.10): resolves emitted [`CoverageEvent`]s
//! against the target index and records hits. The global flavor records
//! directly; the streaming flavor batches a candidate's hits separately
//! so a rejected/unvalidated instance never pollutes the global bitmap.

use std::collections::{BTreeMap, BTreeSet};

use foundrydata_generator::CoverageEvent;

use crate::target::{from_generator_dimension, identity_key, CoverageTarget};

/// Maps an event's identity key to the target id it resolves to. Built
/// once per run from the analyzer's target list.
#[derive(Debug, Clone, Default)]
pub struct TargetIndex {
    by_identity: BTreeMap<String, String>,
}

impl TargetIndex {
    #[must_use]
    pub fn build(targets: &[CoverageTarget]) -> Self {
        let mut by_identity = BTreeMap::new();
        for target in targets {
            by_identity.insert(target.identity_key(), target.id.clone());
        }
        Self { by_identity }
    }

    #[must_use]
    pub fn resolve(&self, event: &CoverageEvent) -> Option<&str> {
        let key = identity_key(
            from_generator_dimension(event.dimension),
            &event.kind,
            &event.canon_path,
            event.operation_key.as_deref(),
            event.params.as_ref(),
        );
        self.by_identity.get(&key).map(String::as_str)
    }
}

/// Records events directly into one process-wide hit set. Not
/// thread-safe — callers owning concurrent runs must give each its own
/// accumulator (only the validator's compile cache is shared, per §5).
#[derive(Debug, Clone, Default)]
pub struct GlobalAccumulator {
    hit_target_ids: BTreeSet<String>,
}

impl GlobalAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `event` against `index`; unresolved events are silently
    /// ignored, as the spec requires (diagnostic-only targets are never
    /// indexed in the first place).
    pub fn record(&mut self, event: &CoverageEvent, index: &TargetIndex) {
        if let Some(id) = index.resolve(event) {
            self.hit_target_ids.insert(id.to_string());
        }
    }

    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a CoverageEvent>, index: &TargetIndex) {
        for event in events {
            self.record(event, index);
        }
    }

    #[must_use]
    pub fn hit_target_ids(&self) -> &BTreeSet<String> {
        &self.hit_target_ids
    }

    #[must_use]
    pub fn is_hit(&self, target_id: &str) -> bool {
        self.hit_target_ids.contains(target_id)
    }
}

/// Per-instance scratch state, merged into the global set only on
/// [`StreamingAccumulator::commit_instance`].
#[derive(Debug, Clone, Default)]
pub struct InstanceState {
    pending_hits: BTreeSet<String>,
}

impl InstanceState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &CoverageEvent, index: &TargetIndex) {
        if let Some(id) = index.resolve(event) {
            self.pending_hits.insert(id.to_string());
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StreamingAccumulator {
    global: GlobalAccumulator,
}

impl StreamingAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new_instance(&self) -> InstanceState {
        InstanceState::new()
    }

    /// Merge `state`'s pending hits into the global set. The instance
    /// state is consumed: a committed state cannot be partially re-used.
    pub fn commit_instance(&mut self, state: InstanceState) {
        self.global.hit_target_ids.extend(state.pending_hits);
    }

    #[must_use]
    pub fn global(&self) -> &GlobalAccumulator {
        &self.global
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundrydata_generator::CoverageDimension as GenDimension;
    use serde_json::json;

    fn sample_target() -> CoverageTarget {
        CoverageTarget::new(
            crate::target::CoverageDimension::Enum,
            "ENUM_VALUE_HIT",
            "#/enum",
            None,
            Some(json!({"enumIndex": 1})),
        )
    }

    fn matching_event() -> CoverageEvent {
        CoverageEvent::new(GenDimension::Enum, "ENUM_VALUE_HIT", "#/enum", Some(json!({"enumIndex": 1})))
    }

    #[test]
    fn global_accumulator_records_a_resolved_event() {
        let target = sample_target();
        let index = TargetIndex::build(std::slice::from_ref(&target));
        let mut acc = GlobalAccumulator::new();
        acc.record(&matching_event(), &index);
        assert!(acc.is_hit(&target.id));
    }

    #[test]
    fn unresolved_event_is_silently_ignored() {
        let index = TargetIndex::build(&[]);
        let mut acc = GlobalAccumulator::new();
        acc.record(&matching_event(), &index);
        assert!(acc.hit_target_ids().is_empty());
    }

    #[test]
    fn streaming_accumulator_isolates_uncommitted_instances() {
        let target = sample_target();
        let index = TargetIndex::build(std::slice::from_ref(&target));
        let mut streaming = StreamingAccumulator::new();
        let mut instance = streaming.new_instance();
        instance.record(&matching_event(), &index);
        assert!(!streaming.global().is_hit(&target.id));

        streaming.commit_instance(instance);
        assert!(streaming.global().is_hit(&target.id));
    }
}
