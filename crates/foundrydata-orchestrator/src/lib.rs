//! Orchestrates the normalize/compose/generate/repair/validate pipeline
//! (§4.12), layering the coverage subsystem on top, and assembles the
//! `PipelineResult` programmatic callers and the CLI both consume.

mod external_refs;
mod pipeline;
mod result;
mod run_id;

pub use pipeline::execute_pipeline;
pub use result::{
    Artifacts, MetricsSnapshot, PipelineResult, PipelineStatus, StageRecord, StageStatus,
    TimelineEntry,
};
pub use run_id::generate_run_id;

#[cfg(test)]
mod tests {
    use super::*;
    use foundrydata_config::PipelineOptions;
    use foundrydata_resolver::ResolutionRegistry;
    use foundrydata_validator::JsonschemaOracle;
    use serde_json::json;

    #[test]
    fn simple_object_schema_completes_end_to_end() {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer", "minimum": 0}
            },
            "required": ["name"]
        });
        let mut options = PipelineOptions::default();
        options.count = 3;
        options.seed = 7;
        let registry = ResolutionRegistry::new();
        let oracle = JsonschemaOracle::new();

        let result = execute_pipeline(&schema, &options, &registry, &oracle);

        assert_eq!(result.status, PipelineStatus::Completed);
        assert_eq!(result.artifacts.generated.len(), 3);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn fatal_unsat_skips_downstream_phases() {
        let schema = json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["missing"],
            "properties": {}
        });
        let options = PipelineOptions::default();
        let registry = ResolutionRegistry::new();
        let oracle = JsonschemaOracle::new();

        let result = execute_pipeline(&schema, &options, &registry, &oracle);

        assert_eq!(result.stages["generate"].status, StageStatus::Skipped);
        assert_eq!(result.stages["repair"].status, StageStatus::Skipped);
        assert_eq!(result.stages["validate"].status, StageStatus::Skipped);
        assert!(result.artifacts.generated.is_empty());
    }

    #[test]
    fn deterministic_across_independent_runs() {
        let schema = json!({
            "type": "object",
            "properties": {"id": {"type": "string"}},
        });
        let mut options = PipelineOptions::default();
        options.count = 5;
        options.seed = 99;
        let registry = ResolutionRegistry::new();
        let oracle = JsonschemaOracle::new();

        let first = execute_pipeline(&schema, &options, &registry, &oracle);
        let second = execute_pipeline(&schema, &options, &registry, &oracle);

        assert_eq!(first.artifacts.generated, second.artifacts.generated);
        assert_eq!(first.run_id, second.run_id);
    }
}
