//! Per-run generator counters folded into the pipeline's metrics snapshot.

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct GenerateMetrics {
    pub items_emitted: usize,
    pub required_keys_dropped: usize,
    pub branches_selected: usize,
    pub examples_used: usize,
    pub regex_capped: usize,
}
