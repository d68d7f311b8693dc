//! Deterministic instance generation from a composed schema plan (§4.5).
//! Given the composer's effective view plus planning options, emits `count`
//! candidate instances under a seeded RNG, alongside the diagnostics,
//! metrics, and coverage events produced while constructing them.

pub mod arrays;
pub mod coverage_event;
pub mod metrics;
pub mod numbers;
pub mod objects;
pub mod options;
pub mod ordering;
pub mod strings;
pub mod type_priority;
pub mod value;

pub use coverage_event::{CoverageDimension, CoverageEvent};
pub use metrics::GenerateMetrics;
pub use options::{CoverageHint, GenerateOptions, PatternWitnessOptions, PlanOptions};

use foundrydata_composer::ComposeOutput;
use foundrydata_diagnostics::Envelope;
use foundrydata_ptrmap::CanonPointer;
use foundrydata_rng::LabeledRng;
use serde_json::Value;

use value::{generate_value, GenCtx};

#[derive(Debug, Clone)]
pub struct GenerateOutput {
    pub items: Vec<Value>,
    pub diagnostics: Vec<Envelope>,
    pub coverage_events: Vec<CoverageEvent>,
    pub metrics: GenerateMetrics,
    pub seed: u32,
}

/// Synthesize `options.count` instances from `compose_output.effective`.
/// Each item is built with its own labeled sub-stream (`"item-{i}"`), so
/// adding or removing items never perturbs the streams already drawn —
/// the core of the determinism contract in §8.1.
#[must_use]
pub fn generate(compose_output: &ComposeOutput, options: &GenerateOptions) -> GenerateOutput {
    let mut items = Vec::with_capacity(options.count as usize);
    let mut diagnostics = Vec::new();
    let mut coverage_events = Vec::new();
    let mut metrics = GenerateMetrics::default();

    let mut start_index = 0usize;
    if options.prefer_examples {
        if let Some(example) = first_verbatim_example(&compose_output.effective) {
            items.push(example);
            metrics.examples_used += 1;
            start_index = 1;
        }
    }

    for i in start_index..options.count as usize {
        let mut labeled = LabeledRng::derive(options.seed, format!("item-{i}"));
        let mut ctx = GenCtx {
            rng: labeled.inner(),
            coverage_index: &compose_output.coverage_index,
            selected_branches: &compose_output.selected_branches,
            contains_bags: &compose_output.contains_bags,
            witness_options: &options.plan_options.pattern_witness,
            coverage_hints: &options.coverage_hints,
            events: Vec::new(),
            diagnostics: Vec::new(),
            metrics: GenerateMetrics::default(),
        };
        let item = generate_value(&compose_output.effective, &CanonPointer::root(), &mut ctx);
        items.push(item);
        coverage_events.extend(ctx.events);
        diagnostics.extend(ctx.diagnostics);
        metrics.required_keys_dropped += ctx.metrics.required_keys_dropped;
        metrics.branches_selected += ctx.metrics.branches_selected;
        metrics.regex_capped += ctx.metrics.regex_capped;
    }
    metrics.items_emitted = items.len();

    GenerateOutput {
        items,
        diagnostics,
        coverage_events,
        metrics,
        seed: options.seed,
    }
}

fn first_verbatim_example(schema: &Value) -> Option<Value> {
    if let Some(examples) = schema.get("examples").and_then(Value::as_array) {
        if let Some(first) = examples.first() {
            return Some(first.clone());
        }
    }
    schema.get("example").cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundrydata_composer::{compose, ComposeOptions};
    use foundrydata_ptrmap::PtrMap;
    use serde_json::json;

    fn compose_schema(schema: &Value) -> ComposeOutput {
        let ptr_map = PtrMap::new();
        compose(schema, &ptr_map, &ComposeOptions::default())
    }

    #[test]
    fn s1_simple_object_generates_count_items_satisfying_bounds() {
        let schema = json!({
            "type": "object",
            "properties": {"id": {"type": "integer", "minimum": 0}, "name": {"type": "string", "minLength": 1}},
            "required": ["id", "name"],
            "additionalProperties": false
        });
        let compose_output = compose_schema(&schema);
        let options = GenerateOptions {
            count: 1,
            seed: 37,
            ..Default::default()
        };
        let output = generate(&compose_output, &options);
        assert_eq!(output.items.len(), 1);
        let item = &output.items[0];
        assert!(item["id"].as_i64().unwrap() >= 0);
        assert!(item["name"].as_str().unwrap().chars().count() >= 1);
    }

    #[test]
    fn determinism_same_seed_same_output() {
        let schema = json!({
            "type": "object",
            "properties": {"a": {"type": "integer", "minimum": 0, "maximum": 1000}},
            "required": ["a"]
        });
        let compose_output = compose_schema(&schema);
        let options = GenerateOptions { count: 5, seed: 2024, ..Default::default() };
        let first = generate(&compose_output, &options);
        let second = generate(&compose_output, &options);
        assert_eq!(first.items, second.items);
    }

    #[test]
    fn ap_false_required_outside_coverage_is_dropped_not_emitted() {
        let schema = json!({
            "type": "object",
            "patternProperties": {"^(?:allowed)$": {"type": "string"}},
            "required": ["forbidden"],
            "additionalProperties": false
        });
        let compose_output = compose_schema(&schema);
        let options = GenerateOptions { count: 1, seed: 1, ..Default::default() };
        let output = generate(&compose_output, &options);
        assert!(output.items[0].get("forbidden").is_none());
        assert!(output.metrics.required_keys_dropped >= 1);
    }

    #[test]
    fn prefer_examples_emits_verbatim_example_first() {
        let schema = json!({"type": "string", "examples": ["literal-example"]});
        let compose_output = compose_schema(&schema);
        let options = GenerateOptions {
            count: 2,
            seed: 5,
            prefer_examples: true,
            ..Default::default()
        };
        let output = generate(&compose_output, &options);
        assert_eq!(output.items[0], json!("literal-example"));
        assert_eq!(output.items.len(), 2);
    }
}
