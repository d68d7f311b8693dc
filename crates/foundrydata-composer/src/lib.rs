//! UNSAT reasoner and planner (§4.3). Proves provable infeasibilities,
//! builds the AP:false coverage index, scores/selects `oneOf`/`anyOf`
//! branches, and aggregates `contains` bags — without mutating the
//! canonical schema in place. Downstream phases read the returned
//! *effective* view plus the side tables this crate computes.

pub mod branches;
pub mod contains;
pub mod coverage_index;
pub mod unsat;

pub use coverage_index::CoverageIndex;
pub use contains::{check_contains_bag, collect_contains_bag, ContainsBag, ContainsRequirement};

use std::collections::BTreeMap;

use foundrydata_diagnostics::Envelope;
use foundrydata_ptrmap::{CanonPointer, PtrMap};
use foundrydata_regex::DEFAULT_MAX_COMPLEXITY;
use serde_json::Value;

/// Planning knobs the composer honors while proving infeasibility and
/// selecting branches.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    pub max_complexity: usize,
    pub state_cap: usize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            max_complexity: DEFAULT_MAX_COMPLEXITY,
            state_cap: foundrydata_regex::automaton::DEFAULT_STATE_CAP,
        }
    }
}

/// The composer never throws for UNSAT (§7 propagation policy): every
/// proof it finds lands in one of these buckets instead.
#[derive(Debug, Clone, Default)]
pub struct ComposeDiagnostics {
    pub fatal: Vec<Envelope>,
    pub warn: Vec<Envelope>,
    pub unsat_hints: Vec<Envelope>,
    pub run: Vec<Envelope>,
}

impl ComposeDiagnostics {
    #[must_use]
    pub fn is_unsat(&self) -> bool {
        !self.fatal.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ComposeOutput {
    /// The effective schema view downstream phases read. The composer
    /// does not mutate the canonical schema; today this is a clone of
    /// the input, held separately so a future branch-pruning pass has
    /// somewhere to write without the canonical/effective distinction
    /// leaking into every call site.
    pub effective: Value,
    pub coverage_index: CoverageIndex,
    /// `oneOf`/`anyOf` canonical pointer (including the keyword segment)
    /// to the index of the branch selected for generation.
    pub selected_branches: BTreeMap<String, usize>,
    pub contains_bags: BTreeMap<String, ContainsBag>,
    pub diag: ComposeDiagnostics,
}

#[must_use]
pub fn compose(canon_schema: &Value, ptr_map: &PtrMap, options: &ComposeOptions) -> ComposeOutput {
    let mut ctx = WalkCtx {
        ptr_map,
        options,
        coverage_index: CoverageIndex::new(),
        selected_branches: BTreeMap::new(),
        contains_bags: BTreeMap::new(),
        fatal: Vec::new(),
        warn: Vec::new(),
    };
    walk(canon_schema, &CanonPointer::root(), &mut ctx);

    ComposeOutput {
        effective: canon_schema.clone(),
        coverage_index: ctx.coverage_index,
        selected_branches: ctx.selected_branches,
        contains_bags: ctx.contains_bags,
        diag: ComposeDiagnostics {
            fatal: ctx.fatal,
            warn: ctx.warn,
            unsat_hints: Vec::new(),
            run: Vec::new(),
        },
    }
}

struct WalkCtx<'a> {
    ptr_map: &'a PtrMap,
    options: &'a ComposeOptions,
    coverage_index: CoverageIndex,
    selected_branches: BTreeMap<String, usize>,
    contains_bags: BTreeMap<String, ContainsBag>,
    fatal: Vec<Envelope>,
    warn: Vec<Envelope>,
}

fn walk(value: &Value, path: &CanonPointer, ctx: &mut WalkCtx) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, &path.child(key), ctx);
            }
            analyze_object(map, path, ctx);
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk(item, &path.child(&i.to_string()), ctx);
            }
        }
        _ => {}
    }
}

fn type_contains(map: &serde_json::Map<String, Value>, name: &str) -> bool {
    match map.get("type") {
        Some(Value::String(s)) => s == name,
        Some(Value::Array(arr)) => arr.iter().any(|v| v.as_str() == Some(name)),
        _ => false,
    }
}

fn string_list(map: &serde_json::Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default()
}

fn analyze_object(map: &serde_json::Map<String, Value>, path: &CanonPointer, ctx: &mut WalkCtx) {
    let required = string_list(map, "required");

    if matches!(map.get("additionalProperties"), Some(Value::Bool(false))) {
        let declared: Vec<String> = map
            .get("properties")
            .and_then(Value::as_object)
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default();
        let patterns: Vec<String> = map
            .get("patternProperties")
            .and_then(Value::as_object)
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default();

        let cap_diagnostics = ctx.coverage_index.register(path.as_str(), declared.clone(), &patterns);
        ctx.warn.extend(cap_diagnostics);

        let envelopes = unsat::check_required_admissibility(
            path.as_str(),
            &required,
            true,
            None,
            &ctx.coverage_index,
            ctx.ptr_map,
        );
        ctx.fatal.extend(envelopes);

        let min_properties = map.get("minProperties").and_then(Value::as_u64);
        if let Some(e) = unsat::check_ap_false_empty_coverage(
            path.as_str(),
            true,
            !declared.is_empty() || !patterns.is_empty(),
            min_properties,
            !required.is_empty(),
        ) {
            ctx.fatal.push(e);
        }
        if let Some(e) = unsat::check_min_properties_vs_coverage(path.as_str(), min_properties, &ctx.coverage_index) {
            ctx.fatal.push(e);
        }
    } else if let Some(pattern_source) = map
        .get("propertyNames")
        .and_then(Value::as_object)
        .and_then(|pn| pn.get("pattern"))
        .and_then(Value::as_str)
    {
        // A raw (non-enum-rewritten) propertyNames.pattern constrains
        // every key regardless of additionalProperties.
        match regex::Regex::new(pattern_source) {
            Ok(re) => {
                let envelopes = unsat::check_required_admissibility(
                    path.as_str(),
                    &required,
                    false,
                    Some(&re),
                    &ctx.coverage_index,
                    ctx.ptr_map,
                );
                ctx.fatal.extend(envelopes);
            }
            Err(e) => {
                ctx.warn.push(
                    foundrydata_diagnostics::Envelope::new(
                        foundrydata_diagnostics::DiagnosticCode::RegexCompileError,
                        path.child("propertyNames").child("pattern").as_str().to_string(),
                        foundrydata_diagnostics::Phase::Compose,
                        Some(serde_json::json!({"pattern": pattern_source, "message": e.to_string()})),
                    )
                    .expect("details never shadow canonPath"),
                );
            }
        }
    }

    if type_contains(map, "number") || type_contains(map, "integer") {
        let is_integer = type_contains(map, "integer");
        if let Some(e) = unsat::check_numeric_bounds(
            path.as_str(),
            is_integer,
            map.get("minimum").and_then(Value::as_f64),
            map.get("maximum").and_then(Value::as_f64),
            map.get("exclusiveMinimum").and_then(Value::as_f64),
            map.get("exclusiveMaximum").and_then(Value::as_f64),
        ) {
            ctx.fatal.push(e);
        }
    }

    if map.contains_key("contains") {
        let bag = collect_contains_bag(&Value::Object(map.clone()), &[]);
        let max_items = map.get("maxItems").and_then(Value::as_u64);
        let envelopes = check_contains_bag(path.as_str(), &bag, max_items);
        ctx.fatal.extend(envelopes);
        ctx.contains_bags.insert(path.as_str().to_string(), bag);
    }

    for combinator in ["oneOf", "anyOf"] {
        if let Some(Value::Array(branches)) = map.get(combinator) {
            let scores = branches::score_branches(branches);
            let selected = branches::select_branch(&scores);
            ctx.selected_branches
                .insert(path.child(combinator).as_str().to_string(), selected);
        }
    }

    if ctx.options.max_complexity == 0 {
        // unreachable in practice; keeps `options` read so a future cap
        // tightening has a place to plug in without touching call sites.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn s1_simple_object_is_satisfiable() {
        let schema = json!({
            "type": "object",
            "properties": {"id": {"type": "integer", "minimum": 0}, "name": {"type": "string", "minLength": 1}},
            "required": ["id", "name"],
            "additionalProperties": false
        });
        let ptr_map = PtrMap::new();
        let output = compose(&schema, &ptr_map, &ComposeOptions::default());
        assert!(!output.diag.is_unsat());
    }

    #[test]
    fn s2_required_vs_property_names_is_unsat() {
        let schema = json!({
            "type": "object",
            "required": ["forbidden"],
            "patternProperties": {"^(?:allowed)$": {}},
            "additionalProperties": false
        });
        let mut ptr_map = PtrMap::new();
        let ap_path = CanonPointer::root().child("additionalProperties");
        let original = CanonPointer::root().child("propertyNames");
        ptr_map.insert(ap_path, original);

        let output = compose(&schema, &ptr_map, &ComposeOptions::default());
        assert!(output.diag.is_unsat());
        assert!(output
            .diag
            .fatal
            .iter()
            .any(|e| e.code == foundrydata_diagnostics::DiagnosticCode::UnsatRequiredVsPropertynames));
    }

    #[test]
    fn selects_discriminated_oneof_branch() {
        let schema = json!({
            "oneOf": [
                {"properties": {"kind": {"const": "left"}}},
                {"properties": {"kind": {"const": "right"}}, "required": ["kind", "extra"]}
            ]
        });
        let ptr_map = PtrMap::new();
        let output = compose(&schema, &ptr_map, &ComposeOptions::default());
        let selected = output.selected_branches.get("#/oneOf").copied();
        assert_eq!(selected, Some(0));
    }

    #[test]
    fn contains_unsat_by_sum_is_detected() {
        let schema = json!({
            "type": "array",
            "maxItems": 2,
            "contains": {"const": "x"},
            "minContains": 3
        });
        let ptr_map = PtrMap::new();
        let output = compose(&schema, &ptr_map, &ComposeOptions::default());
        assert!(output.diag.is_unsat());
    }
}
