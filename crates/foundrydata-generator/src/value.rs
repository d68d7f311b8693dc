//! The recursive per-node instance synthesizer. Single entry point
//! [`generate_value`] dispatches on the node's effective type, after
//! resolving `oneOf`/`anyOf` (via the composer's branch selection),
//! `const`, and `enum`.

use std::collections::BTreeMap;

use foundrydata_composer::{CoverageIndex, ContainsBag};
use foundrydata_diagnostics::Envelope;
use foundrydata_ptrmap::CanonPointer;
use foundrydata_rng::XorShift32;
use serde_json::{Map, Value};

use crate::arrays::assemble_items;
use crate::coverage_event::{CoverageDimension, CoverageEvent};
use crate::metrics::GenerateMetrics;
use crate::objects::plan_object_keys;
use crate::options::{CoverageHint, PatternWitnessOptions};
use crate::strings::synthesize_string;
use crate::type_priority::pick_type;
use crate::numbers;

pub struct GenCtx<'a> {
    pub rng: &'a mut XorShift32,
    pub coverage_index: &'a CoverageIndex,
    pub selected_branches: &'a BTreeMap<String, usize>,
    pub contains_bags: &'a BTreeMap<String, ContainsBag>,
    pub witness_options: &'a PatternWitnessOptions,
    pub coverage_hints: &'a BTreeMap<String, Vec<CoverageHint>>,
    pub events: Vec<CoverageEvent>,
    pub diagnostics: Vec<Envelope>,
    pub metrics: GenerateMetrics,
}

fn schema_type_strings(map: &Map<String, Value>) -> Vec<String> {
    match map.get("type") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str().map(String::from)).collect(),
        _ => Vec::new(),
    }
}

fn infer_type(map: &Map<String, Value>) -> &'static str {
    if map.contains_key("properties") || map.contains_key("required") || map.contains_key("additionalProperties") {
        "object"
    } else if map.contains_key("items") || map.contains_key("prefixItems") || map.contains_key("contains") {
        "array"
    } else {
        "string"
    }
}

fn merge_branch(map: &Map<String, Value>, combinator: &str, branch: &Value) -> Value {
    let mut merged = map.clone();
    merged.remove("oneOf");
    merged.remove("anyOf");
    let _ = combinator;
    if let Value::Object(branch_map) = branch {
        for (k, v) in branch_map {
            merged.insert(k.clone(), v.clone());
        }
    }
    Value::Object(merged)
}

pub fn generate_value(schema: &Value, path: &CanonPointer, ctx: &mut GenCtx) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };

    for combinator in ["oneOf", "anyOf"] {
        if let Some(Value::Array(branches)) = map.get(combinator) {
            let key = path.child(combinator).as_str().to_string();
            let hinted = ctx.coverage_hints.get(path.as_str()).and_then(|hints| {
                hints.iter().find_map(|h| match h {
                    CoverageHint::PreferBranch(i) => Some(*i),
                    _ => None,
                })
            });
            let idx = hinted
                .or_else(|| ctx.selected_branches.get(&key).copied())
                .unwrap_or(0)
                .min(branches.len().saturating_sub(1));
            let branch = branches.get(idx).cloned().unwrap_or(Value::Object(Map::new()));
            let kind = if combinator == "oneOf" { "ONEOF_BRANCH" } else { "ANYOF_BRANCH" };
            ctx.events.push(CoverageEvent::new(
                CoverageDimension::Branches,
                kind,
                key,
                Some(serde_json::json!({"index": idx})),
            ));
            ctx.metrics.branches_selected += 1;
            let merged = merge_branch(map, combinator, &branch);
            return generate_value(&merged, path, ctx);
        }
    }

    if let Some(const_value) = map.get("const") {
        return const_value.clone();
    }

    if let Some(Value::Array(values)) = map.get("enum") {
        if values.is_empty() {
            return Value::Null;
        }
        let hinted = ctx.coverage_hints.get(path.as_str()).and_then(|hints| {
            hints.iter().find_map(|h| match h {
                CoverageHint::CoverEnumValue(i) => Some(*i),
                _ => None,
            })
        });
        let idx = hinted.unwrap_or_else(|| ctx.rng.gen_below(values.len() as u32) as usize) % values.len();
        ctx.events.push(CoverageEvent::new(
            CoverageDimension::Enum,
            "ENUM_VALUE_HIT",
            path.child("enum").as_str(),
            Some(serde_json::json!({"enumIndex": idx})),
        ));
        return values[idx].clone();
    }

    let declared_types = schema_type_strings(map);
    let type_refs: Vec<&str> = declared_types.iter().map(String::as_str).collect();
    let resolved_type = if type_refs.is_empty() {
        infer_type(map).to_string()
    } else {
        pick_type(&type_refs).unwrap_or(type_refs[0]).to_string()
    };

    ctx.events.push(CoverageEvent::new(CoverageDimension::Structure, "SCHEMA_NODE", path.as_str(), None));

    match resolved_type.as_str() {
        "object" => generate_object(map, path, ctx),
        "array" => generate_array(map, path, ctx),
        "string" => generate_string(map, path, ctx),
        "integer" => generate_numeric(map, path, ctx, true),
        "number" => generate_numeric(map, path, ctx, false),
        "boolean" => Value::Bool(ctx.rng.next_u32() % 2 == 0),
        "null" => Value::Null,
        _ => Value::Null,
    }
}

fn generate_object(map: &Map<String, Value>, path: &CanonPointer, ctx: &mut GenCtx) -> Value {
    let properties = map.get("properties").and_then(Value::as_object);
    let declared: Vec<String> = properties.map(|p| p.keys().cloned().collect()).unwrap_or_default();
    let required: Vec<String> = map
        .get("required")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();
    let ap_false = matches!(map.get("additionalProperties"), Some(Value::Bool(false)));

    let plan = plan_object_keys(path.as_str(), &declared, &required, ap_false, ctx.coverage_index);
    ctx.metrics.required_keys_dropped += plan.diagnostics.len();
    ctx.diagnostics.extend(plan.diagnostics);

    let mut object = Map::new();
    for key in &plan.keys {
        let present = ctx
            .coverage_hints
            .get(path.as_str())
            .and_then(|hints| {
                hints.iter().find_map(|h| match h {
                    CoverageHint::EnsurePropertyPresence(name, present) if name == key => Some(*present),
                    _ => None,
                })
            })
            .unwrap_or(true);
        if !present {
            continue;
        }
        let child_schema = properties.and_then(|p| p.get(key)).cloned().unwrap_or(Value::Bool(true));
        let child_path = path.child("properties").child(key);
        let value = generate_value(&child_schema, &child_path, ctx);
        ctx.events.push(CoverageEvent::new(
            CoverageDimension::Structure,
            "PROPERTY_PRESENT",
            path.child("properties").child(key).as_str(),
            Some(serde_json::json!({"propertyName": key})),
        ));
        object.insert(key.clone(), value);
    }
    Value::Object(object)
}

fn generate_array(map: &Map<String, Value>, path: &CanonPointer, ctx: &mut GenCtx) -> Value {
    let min_items = map.get("minItems").and_then(Value::as_u64);
    let max_items = map.get("maxItems").and_then(Value::as_u64);
    let unique_items = map.get("uniqueItems").and_then(Value::as_bool).unwrap_or(false);

    let item_schema = map.get("items").cloned().unwrap_or(Value::Bool(true));
    let item_path = path.child("items");

    let mut contains_items = Vec::new();
    if let Some(contains_schema) = map.get("contains") {
        let min_contains = map.get("minContains").and_then(Value::as_u64).unwrap_or(1);
        let contains_path = path.child("contains");
        for _ in 0..min_contains {
            contains_items.push(generate_value(contains_schema, &contains_path, ctx));
        }
    }

    let bag = ctx.contains_bags.get(path.as_str());

    // Pre-extracted so the filler closure below borrows only these shared
    // references, never `ctx` itself — `ctx.rng` is reborrowed as the
    // `assemble_items` argument at the same time, and a closure capturing
    // the whole `ctx` would conflict with that reborrow.
    let coverage_index = ctx.coverage_index;
    let selected_branches = ctx.selected_branches;
    let contains_bags = ctx.contains_bags;
    let witness_options = ctx.witness_options;
    let coverage_hints = ctx.coverage_hints;
    let mut local_events = Vec::new();
    let mut local_diagnostics = Vec::new();
    let mut local_metrics = GenerateMetrics::default();

    let items = assemble_items(
        ctx.rng,
        bag,
        min_items,
        max_items,
        unique_items,
        contains_items,
        |rng| {
            let mut inner_ctx = GenCtx {
                rng,
                coverage_index,
                selected_branches,
                contains_bags,
                witness_options,
                coverage_hints,
                events: Vec::new(),
                diagnostics: Vec::new(),
                metrics: GenerateMetrics::default(),
            };
            let value = generate_value(&item_schema, &item_path, &mut inner_ctx);
            local_events.extend(inner_ctx.events);
            local_diagnostics.extend(inner_ctx.diagnostics);
            local_metrics.required_keys_dropped += inner_ctx.metrics.required_keys_dropped;
            local_metrics.branches_selected += inner_ctx.metrics.branches_selected;
            local_metrics.regex_capped += inner_ctx.metrics.regex_capped;
            value
        },
    );
    ctx.events.extend(local_events);
    ctx.diagnostics.extend(local_diagnostics);
    ctx.metrics.required_keys_dropped += local_metrics.required_keys_dropped;
    ctx.metrics.branches_selected += local_metrics.branches_selected;
    ctx.metrics.regex_capped += local_metrics.regex_capped;

    let len = items.len() as u64;
    if min_items.is_some_and(|m| len == m) {
        ctx.events.push(CoverageEvent::new(
            CoverageDimension::Boundaries,
            "ARRAY_MIN_ITEMS_HIT",
            path.as_str(),
            Some(serde_json::json!({"boundaryKind": "min"})),
        ));
    }
    if max_items.is_some_and(|m| len == m) {
        ctx.events.push(CoverageEvent::new(
            CoverageDimension::Boundaries,
            "ARRAY_MAX_ITEMS_HIT",
            path.as_str(),
            Some(serde_json::json!({"boundaryKind": "max"})),
        ));
    }
    Value::Array(items)
}

fn generate_string(map: &Map<String, Value>, path: &CanonPointer, ctx: &mut GenCtx) -> Value {
    let min_length = map.get("minLength").and_then(Value::as_u64);
    let max_length = map.get("maxLength").and_then(Value::as_u64);
    let pattern = map.get("pattern").and_then(Value::as_str);
    let (value, diagnostics) = synthesize_string(ctx.rng, path.as_str(), min_length, max_length, pattern, ctx.witness_options);
    ctx.metrics.regex_capped += diagnostics.len();
    ctx.diagnostics.extend(diagnostics);

    if let Some(s) = value.as_str() {
        let len = crate::strings::code_point_len(s) as u64;
        if min_length.is_some_and(|m| len == m) {
            ctx.events.push(CoverageEvent::new(
                CoverageDimension::Boundaries,
                "STRING_MIN_LENGTH_HIT",
                path.as_str(),
                Some(serde_json::json!({"boundaryKind": "min"})),
            ));
        }
        if max_length.is_some_and(|m| len == m) {
            ctx.events.push(CoverageEvent::new(
                CoverageDimension::Boundaries,
                "STRING_MAX_LENGTH_HIT",
                path.as_str(),
                Some(serde_json::json!({"boundaryKind": "max"})),
            ));
        }
    }
    value
}

fn generate_numeric(map: &Map<String, Value>, path: &CanonPointer, ctx: &mut GenCtx, is_integer: bool) -> Value {
    let minimum = map.get("minimum").and_then(Value::as_f64);
    let maximum = map.get("maximum").and_then(Value::as_f64);
    let exclusive_minimum = map.get("exclusiveMinimum").and_then(Value::as_f64);
    let exclusive_maximum = map.get("exclusiveMaximum").and_then(Value::as_f64);
    let multiple_of = map.get("multipleOf").and_then(Value::as_f64);

    let value = if is_integer {
        numbers::synthesize_integer(ctx.rng, minimum, maximum, exclusive_minimum, exclusive_maximum, multiple_of)
    } else {
        numbers::synthesize_number(ctx.rng, minimum, maximum, exclusive_minimum, exclusive_maximum, multiple_of)
    };

    if let Some(n) = value.as_f64() {
        if minimum.is_some_and(|m| n == m) {
            ctx.events.push(CoverageEvent::new(
                CoverageDimension::Boundaries,
                "NUMERIC_MIN_HIT",
                path.as_str(),
                Some(serde_json::json!({"boundaryKind": "min"})),
            ));
        }
        if maximum.is_some_and(|m| n == m) {
            ctx.events.push(CoverageEvent::new(
                CoverageDimension::Boundaries,
                "NUMERIC_MAX_HIT",
                path.as_str(),
                Some(serde_json::json!({"boundaryKind": "max"})),
            ));
        }
    }
    value
}
