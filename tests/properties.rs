//! Property-based checks for the quantified invariants of §8:
//! determinism (1) and soundness (2) across arbitrary object schemas.

use foundrydata_config::PipelineOptions;
use foundrydata_orchestrator::{PipelineStatus, execute_pipeline};
use foundrydata_resolver::ResolutionRegistry;
use foundrydata_validator::JsonschemaOracle;
use proptest::prelude::*;
use serde_json::{Value, json};

fn object_schema(min_length: u32, minimum: i64, required_name: bool) -> Value {
    let mut required = vec!["age"];
    if required_name {
        required.push("name");
    }
    json!({
        "type": "object",
        "properties": {
            "name": {"type": "string", "minLength": min_length},
            "age": {"type": "integer", "minimum": minimum}
        },
        "required": required,
        "additionalProperties": false
    })
}

fn run(schema: &Value, options: &PipelineOptions) -> foundrydata_orchestrator::PipelineResult {
    let registry = ResolutionRegistry::new();
    let oracle = JsonschemaOracle::new();
    execute_pipeline(schema, options, &registry, &oracle)
}

proptest! {
    #[test]
    fn determinism_holds_across_independent_runs(
        min_length in 0u32..5,
        minimum in -10i64..10,
        required_name in any::<bool>(),
        seed in any::<u32>(),
        count in 1u32..10,
    ) {
        let schema = object_schema(min_length, minimum, required_name);
        let mut options = PipelineOptions::default();
        options.seed = seed;
        options.count = count;

        let first = run(&schema, &options);
        let second = run(&schema, &options);

        prop_assert_eq!(first.run_id, second.run_id);
        prop_assert_eq!(first.artifacts.generated, second.artifacts.generated);
        prop_assert_eq!(first.status, second.status);
    }

    #[test]
    fn completed_items_validate_against_the_original_schema(
        min_length in 0u32..5,
        minimum in -10i64..10,
        required_name in any::<bool>(),
        seed in any::<u32>(),
        count in 1u32..20,
    ) {
        let schema = object_schema(min_length, minimum, required_name);
        let mut options = PipelineOptions::default();
        options.seed = seed;
        options.count = count;

        let result = run(&schema, &options);
        if result.status == PipelineStatus::Completed {
            let oracle = JsonschemaOracle::new();
            let key = foundrydata_validator::ValidatorCacheKey::new(&schema, &[], "props-test", "0");
            for item in &result.artifacts.generated {
                let report = oracle.validate(&key, &schema, item).unwrap();
                prop_assert!(report.is_valid, "item {item:?} failed source-oracle validation: {:?}", report.probe_errors);
            }
        }
    }
}
