//! Coverage analyzer (§4.8): walks the composed effective schema and
//! materializes a target per enabled dimension, attaching each to a
//! graph node keyed by canonical path.

use foundrydata_composer::CoverageIndex;
use foundrydata_diagnostics::Envelope;
use foundrydata_ptrmap::CanonPointer;
use serde_json::Value;

use crate::graph::{CoverageGraph, EdgeKind, NodeKind};
use crate::target::{CoverageDimension, CoverageTarget, TargetStatus};

#[derive(Debug, Clone, Default)]
pub struct AnalyzerOutput {
    pub graph: CoverageGraph,
    pub targets: Vec<CoverageTarget>,
}

struct Ctx<'a> {
    coverage_index: &'a CoverageIndex,
    dimensions: &'a [CoverageDimension],
    fatal_prefixes: Vec<String>,
    graph: CoverageGraph,
    targets: Vec<CoverageTarget>,
}

impl Ctx<'_> {
    fn enabled(&self, dimension: CoverageDimension) -> bool {
        self.dimensions.contains(&dimension)
    }

    fn push(&mut self, mut target: CoverageTarget, node_id: &str) {
        if self.fatal_prefixes.iter().any(|p| target.canon_path == *p || target.canon_path.starts_with(&format!("{p}/"))) {
            target.status = TargetStatus::Unreachable;
        }
        self.graph.add_edge(node_id, &target.id, EdgeKind::Structural);
        self.targets.push(target);
    }
}

/// `fatal_diagnostics` are the composer's UNSAT envelopes; any target
/// whose canonical path falls under one of their paths is marked
/// `unreachable` rather than pruned, so it still appears (uncountable)
/// in the report.
#[must_use]
pub fn analyze(canon_schema: &Value, coverage_index: &CoverageIndex, fatal_diagnostics: &[Envelope], dimensions_enabled: &[CoverageDimension]) -> AnalyzerOutput {
    let mut ctx = Ctx {
        coverage_index,
        dimensions: dimensions_enabled,
        fatal_prefixes: fatal_diagnostics.iter().map(|e| e.canon_path.clone()).collect(),
        graph: CoverageGraph::new(),
        targets: Vec::new(),
    };
    walk(canon_schema, &CanonPointer::root(), &mut ctx);
    AnalyzerOutput {
        graph: ctx.graph,
        targets: ctx.targets,
    }
}

fn walk(value: &Value, path: &CanonPointer, ctx: &mut Ctx) {
    if let Value::Object(map) = value {
        analyze_node(map, path, ctx);
        for (key, child) in map {
            walk(child, &path.child(key), ctx);
        }
    } else if let Value::Array(items) = value {
        for (i, item) in items.iter().enumerate() {
            walk(item, &path.child(&i.to_string()), ctx);
        }
    }
}

fn analyze_node(map: &serde_json::Map<String, Value>, path: &CanonPointer, ctx: &mut Ctx) {
    let node_id = ctx.graph.add_node(NodeKind::Schema, path.as_str());

    if ctx.enabled(CoverageDimension::Structure) {
        let target = CoverageTarget::new(CoverageDimension::Structure, "SCHEMA_NODE", path.as_str(), None, None);
        ctx.push(target, &node_id);
        analyze_properties(map, path, ctx, &node_id);
    }

    if ctx.enabled(CoverageDimension::Branches) {
        analyze_branches(map, path, ctx, &node_id);
    }

    if ctx.enabled(CoverageDimension::Enum) {
        analyze_enum(map, path, ctx, &node_id);
    }

    if ctx.enabled(CoverageDimension::Boundaries) {
        analyze_boundaries(map, path, ctx, &node_id);
    }
}

fn analyze_properties(map: &serde_json::Map<String, Value>, path: &CanonPointer, ctx: &mut Ctx, node_id: &str) {
    let declared: Vec<String> = map
        .get("properties")
        .and_then(Value::as_object)
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default();

    for name in &declared {
        let prop_path = path.child("properties").child(name);
        let prop_node = ctx.graph.add_node(NodeKind::Property, prop_path.as_str());
        ctx.graph.add_edge(node_id, &prop_node, EdgeKind::Structural);
        let target = CoverageTarget::new(
            CoverageDimension::Structure,
            "PROPERTY_PRESENT",
            prop_path.as_str(),
            None,
            Some(serde_json::json!({"propertyName": name})),
        );
        ctx.push(target, &prop_node);
    }

    if matches!(map.get("additionalProperties"), Some(Value::Bool(false))) {
        if let Some(enumerated) = ctx.coverage_index.enumerate(path.as_str()) {
            for name in enumerated {
                if declared.contains(&name) {
                    continue;
                }
                let prop_path = path.child("properties").child(&name);
                let prop_node = ctx.graph.add_node(NodeKind::Property, prop_path.as_str());
                ctx.graph.add_edge(node_id, &prop_node, EdgeKind::Structural);
                let target = CoverageTarget::new(
                    CoverageDimension::Structure,
                    "PROPERTY_PRESENT",
                    prop_path.as_str(),
                    None,
                    Some(serde_json::json!({"propertyName": name})),
                );
                ctx.push(target, &prop_node);
            }
        }
    }
}

fn analyze_branches(map: &serde_json::Map<String, Value>, path: &CanonPointer, ctx: &mut Ctx, node_id: &str) {
    for (combinator, kind) in [("oneOf", "ONEOF_BRANCH"), ("anyOf", "ANYOF_BRANCH")] {
        if let Some(Value::Array(branches)) = map.get(combinator) {
            let combinator_path = path.child(combinator);
            let branch_node = ctx.graph.add_node(NodeKind::Branch, combinator_path.as_str());
            ctx.graph.add_edge(node_id, &branch_node, EdgeKind::Logical);
            for (index, _) in branches.iter().enumerate() {
                let target = CoverageTarget::new(
                    CoverageDimension::Branches,
                    kind,
                    combinator_path.as_str(),
                    None,
                    Some(serde_json::json!({"index": index})),
                );
                ctx.push(target, &branch_node);
            }
        }
    }

    if map.contains_key("if") {
        let if_path = path.child("if");
        let branch_node = ctx.graph.add_node(NodeKind::Branch, if_path.as_str());
        ctx.graph.add_edge(node_id, &branch_node, EdgeKind::Logical);
        if map.contains_key("then") {
            let target = CoverageTarget::new(
                CoverageDimension::Branches,
                "CONDITIONAL_PATH",
                if_path.as_str(),
                None,
                Some(serde_json::json!({"pathKind": "then"})),
            );
            ctx.push(target, &branch_node);
        }
        if map.contains_key("else") {
            let target = CoverageTarget::new(
                CoverageDimension::Branches,
                "CONDITIONAL_PATH",
                if_path.as_str(),
                None,
                Some(serde_json::json!({"pathKind": "else"})),
            );
            ctx.push(target, &branch_node);
        }
    }
}

fn analyze_enum(map: &serde_json::Map<String, Value>, path: &CanonPointer, ctx: &mut Ctx, node_id: &str) {
    if let Some(Value::Array(values)) = map.get("enum") {
        let enum_path = path.child("enum");
        let enum_node = ctx.graph.add_node(NodeKind::Enum, enum_path.as_str());
        ctx.graph.add_edge(node_id, &enum_node, EdgeKind::Structural);
        for (index, _) in values.iter().enumerate() {
            let target = CoverageTarget::new(
                CoverageDimension::Enum,
                "ENUM_VALUE_HIT",
                enum_path.as_str(),
                None,
                Some(serde_json::json!({"enumIndex": index})),
            );
            ctx.push(target, &enum_node);
        }
    }
}

fn analyze_boundaries(map: &serde_json::Map<String, Value>, path: &CanonPointer, ctx: &mut Ctx, node_id: &str) {
    let constraint_node = ctx.graph.add_node(NodeKind::Constraint, path.as_str());
    ctx.graph.add_edge(node_id, &constraint_node, EdgeKind::Structural);

    let has_numeric_bound = map.contains_key("minimum") || map.contains_key("exclusiveMinimum");
    let has_numeric_max = map.contains_key("maximum") || map.contains_key("exclusiveMaximum");
    if has_numeric_bound {
        ctx.push(
            CoverageTarget::new(CoverageDimension::Boundaries, "NUMERIC_MIN_HIT", path.as_str(), None, Some(serde_json::json!({"boundaryKind": "min"}))),
            &constraint_node,
        );
    }
    if has_numeric_max {
        ctx.push(
            CoverageTarget::new(CoverageDimension::Boundaries, "NUMERIC_MAX_HIT", path.as_str(), None, Some(serde_json::json!({"boundaryKind": "max"}))),
            &constraint_node,
        );
    }
    if map.contains_key("minLength") {
        ctx.push(
            CoverageTarget::new(CoverageDimension::Boundaries, "STRING_MIN_LENGTH_HIT", path.as_str(), None, Some(serde_json::json!({"boundaryKind": "min"}))),
            &constraint_node,
        );
    }
    if map.contains_key("maxLength") {
        ctx.push(
            CoverageTarget::new(CoverageDimension::Boundaries, "STRING_MAX_LENGTH_HIT", path.as_str(), None, Some(serde_json::json!({"boundaryKind": "max"}))),
            &constraint_node,
        );
    }
    if map.contains_key("minItems") {
        ctx.push(
            CoverageTarget::new(CoverageDimension::Boundaries, "ARRAY_MIN_ITEMS_HIT", path.as_str(), None, Some(serde_json::json!({"boundaryKind": "min"}))),
            &constraint_node,
        );
    }
    if map.contains_key("maxItems") {
        ctx.push(
            CoverageTarget::new(CoverageDimension::Boundaries, "ARRAY_MAX_ITEMS_HIT", path.as_str(), None, Some(serde_json::json!({"boundaryKind": "max"}))),
            &constraint_node,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundrydata_diagnostics::{DiagnosticCode, Phase};
    use serde_json::json;

    fn dims() -> Vec<CoverageDimension> {
        vec![
            CoverageDimension::Structure,
            CoverageDimension::Branches,
            CoverageDimension::Enum,
            CoverageDimension::Boundaries,
        ]
    }

    #[test]
    fn s1_simple_object_yields_schema_node_and_property_targets() {
        let schema = json!({
            "type": "object",
            "properties": {"id": {"type": "integer", "minimum": 0}, "name": {"type": "string", "minLength": 1}},
            "required": ["id", "name"]
        });
        let index = CoverageIndex::new();
        let output = analyze(&schema, &index, &[], &dims());
        assert!(output.targets.iter().any(|t| t.kind == "SCHEMA_NODE"));
        assert!(output.targets.iter().any(|t| t.kind == "PROPERTY_PRESENT" && t.canon_path.ends_with("/id")));
        assert!(output.targets.iter().any(|t| t.kind == "NUMERIC_MIN_HIT"));
        assert!(output.targets.iter().any(|t| t.kind == "STRING_MIN_LENGTH_HIT"));
    }

    #[test]
    fn s3_oneof_with_three_branches_yields_three_targets() {
        let schema = json!({
            "oneOf": [
                {"properties": {"kind": {"const": "left"}}},
                {"properties": {"kind": {"const": "right"}}},
                {"properties": {"kind": {"const": "center"}}},
            ]
        });
        let index = CoverageIndex::new();
        let output = analyze(&schema, &index, &[], &dims());
        let oneof_targets: Vec<_> = output.targets.iter().filter(|t| t.kind == "ONEOF_BRANCH").collect();
        assert_eq!(oneof_targets.len(), 3);
    }

    #[test]
    fn s4_enum_with_four_values_yields_four_targets() {
        let schema = json!({"enum": ["red", "green", "blue", "yellow"]});
        let index = CoverageIndex::new();
        let output = analyze(&schema, &index, &[], &dims());
        let enum_targets: Vec<_> = output.targets.iter().filter(|t| t.kind == "ENUM_VALUE_HIT").collect();
        assert_eq!(enum_targets.len(), 4);
    }

    #[test]
    fn target_under_a_fatal_prefix_is_marked_unreachable() {
        let schema = json!({"properties": {"a": {"type": "string"}}});
        let index = CoverageIndex::new();
        let fatal = vec![Envelope::without_details(DiagnosticCode::UnsatRequiredPnames, "#/properties/a", Phase::Compose)];
        let output = analyze(&schema, &index, &fatal, &dims());
        let target = output.targets.iter().find(|t| t.canon_path == "#/properties/a").unwrap();
        assert_eq!(target.status, TargetStatus::Unreachable);
    }

    #[test]
    fn ap_false_enumerable_names_become_property_present_targets() {
        let schema = json!({"additionalProperties": false, "patternProperties": {"^(?:a|b)$": {}}});
        let mut index = CoverageIndex::new();
        index.register("#", Vec::<String>::new(), &["^(?:a|b)$".to_string()]);
        let output = analyze(&schema, &index, &[], &dims());
        assert!(output.targets.iter().any(|t| t.kind == "PROPERTY_PRESENT" && t.canon_path.ends_with("/a")));
        assert!(output.targets.iter().any(|t| t.kind == "PROPERTY_PRESENT" && t.canon_path.ends_with("/b")));
    }
}
