//! Bounded post-generation repair (§4.6): given an instance that failed
//! oracle validation, apply at most a handful of safe, local edits and
//! hand the result back for re-validation. Repair never loops on its
//! own — the orchestrator owns the generate/validate/repair cycle and
//! decides when to give up entirely.

pub mod action;
pub mod coerce;
pub mod fill;
pub mod navigate;
pub mod probe;
pub mod rename;

pub use action::{RepairAction, RepairActionKind};
pub use probe::ProbeError;

use foundrydata_composer::CoverageIndex;
use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};
use serde_json::Value;

/// Lower bound on repair attempts per §4.6 — always try at least one edit.
const MIN_ATTEMPTS: u8 = 1;
/// Upper bound on repair attempts per §4.6.
const MAX_ATTEMPTS: u8 = 3;

#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub candidate: Value,
    pub actions: Vec<RepairAction>,
    pub diagnostics: Vec<Envelope>,
    pub attempts_used: u8,
    /// Set once repair stops short of exhausting `errors` — either
    /// because an edit didn't change anything (a guard-tripped no-op),
    /// an error's keyword has no safe edit, or the attempt budget ran out.
    pub surrendered: bool,
}

/// Apply at most `max_attempts` (clamped to 1..=3) safe edits to
/// `candidate`, one per entry in `errors`, in order. Stops at the first
/// error whose keyword has no safe edit, or the first edit that doesn't
/// actually change the candidate (`REPAIR_EVAL_GUARD_FAIL`).
#[must_use]
pub fn repair(
    candidate: &Value,
    effective_schema: &Value,
    coverage_index: &CoverageIndex,
    errors: &[ProbeError],
    max_attempts: u8,
) -> RepairOutcome {
    let max_attempts = max_attempts.clamp(MIN_ATTEMPTS, MAX_ATTEMPTS);
    let mut current = candidate.clone();
    let mut actions = Vec::new();
    let mut diagnostics = Vec::new();
    let mut surrendered = false;
    let mut attempts_used = 0u8;

    for error in errors {
        if attempts_used >= max_attempts {
            surrendered = true;
            break;
        }

        let before = current.clone();
        let applied = match error.keyword.as_str() {
            "required" => apply_fill_required(&mut current, effective_schema, error),
            "additionalProperties" => apply_drop_extraneous(&mut current, error),
            "pattern" => apply_coerce_pattern(&mut current, effective_schema, error),
            "propertyNames" => apply_rename(&mut current, coverage_index, error),
            _ => None,
        };

        let Some(action) = applied else {
            surrendered = true;
            break;
        };

        if current == before {
            diagnostics.push(
                Envelope::new(
                    DiagnosticCode::RepairEvalGuardFail,
                    error.canon_path.clone().unwrap_or_default(),
                    Phase::Repair,
                    Some(serde_json::json!({"instancePath": error.instance_path})),
                )
                .expect("details never shadow canonPath"),
            );
            surrendered = true;
            break;
        }

        actions.push(action);
        attempts_used += 1;
    }

    RepairOutcome {
        candidate: current,
        actions,
        diagnostics,
        attempts_used,
        surrendered,
    }
}

fn missing_property(error: &ProbeError) -> Option<String> {
    error.params.as_ref()?.get("missingProperty")?.as_str().map(str::to_string)
}

fn additional_property(error: &ProbeError) -> Option<String> {
    error.params.as_ref()?.get("additionalProperty")?.as_str().map(str::to_string)
}

fn apply_fill_required(candidate: &mut Value, effective_schema: &Value, error: &ProbeError) -> Option<RepairAction> {
    let key = missing_property(error)?;
    let object = navigate::navigate_mut(candidate, &error.instance_path)?;
    let Value::Object(map) = object else { return None };
    if map.contains_key(&key) {
        return None;
    }

    let schema_node = error
        .canon_path
        .as_deref()
        .and_then(|p| navigate::navigate(effective_schema, &format!("{p}/properties/{key}")));
    let default = fill::type_default(schema_node);
    map.insert(key.clone(), default);

    Some(RepairAction {
        action: RepairActionKind::FillRequiredDefault,
        canon_path: error.canon_path.clone(),
        orig_path: None,
        instance_path: format!("{}/{}", error.instance_path, key),
        details: Some(serde_json::json!({"property": key})),
    })
}

fn apply_drop_extraneous(candidate: &mut Value, error: &ProbeError) -> Option<RepairAction> {
    let key = additional_property(error)?;
    let object = navigate::navigate_mut(candidate, &error.instance_path)?;
    let Value::Object(map) = object else { return None };
    map.remove(&key)?;

    Some(RepairAction {
        action: RepairActionKind::DropExtraneousProperty,
        canon_path: error.canon_path.clone(),
        orig_path: None,
        instance_path: format!("{}/{}", error.instance_path, key),
        details: Some(serde_json::json!({"property": key})),
    })
}

fn apply_coerce_pattern(candidate: &mut Value, effective_schema: &Value, error: &ProbeError) -> Option<RepairAction> {
    let pattern = error
        .canon_path
        .as_deref()
        .and_then(|p| navigate::navigate(effective_schema, p))
        .and_then(|node| node.get("pattern"))
        .and_then(Value::as_str)?;

    let slot = navigate::navigate_mut(candidate, &error.instance_path)?;
    let current = slot.as_str()?.to_string();
    let witness = coerce::coerce_to_pattern_witness(pattern, &current)?;
    *slot = Value::String(witness.clone());

    Some(RepairAction {
        action: RepairActionKind::CoercePatternEnum,
        canon_path: error.canon_path.clone(),
        orig_path: None,
        instance_path: error.instance_path.clone(),
        details: Some(serde_json::json!({"from": current, "to": witness})),
    })
}

fn apply_rename(candidate: &mut Value, coverage_index: &CoverageIndex, error: &ProbeError) -> Option<RepairAction> {
    let (parent, last_segment) = navigate::navigate_parent_mut(candidate, &error.instance_path)?;
    let Value::Object(map) = parent else { return None };
    let offending_key = last_segment;
    let value = map.get(&offending_key)?.clone();

    let canon_path = error.canon_path.as_deref()?;
    let replacement = rename::pick_replacement_name(coverage_index, canon_path, map, &offending_key)?;

    map.remove(&offending_key);
    map.insert(replacement.clone(), value);

    let parent_path = error.instance_path.rsplit_once('/').map_or("", |(p, _)| p);
    Some(RepairAction {
        action: RepairActionKind::RenameProperty,
        canon_path: error.canon_path.clone(),
        orig_path: Some(error.instance_path.clone()),
        instance_path: format!("{parent_path}/{replacement}"),
        details: Some(serde_json::json!({"from": offending_key, "to": replacement})),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fills_missing_required_key_with_type_default() {
        let candidate = json!({});
        let schema = json!({"properties": {"name": {"type": "string", "minLength": 2}}});
        let error = ProbeError {
            instance_path: String::new(),
            keyword: "required".to_string(),
            canon_path: Some(String::new()),
            message: "missing required property".to_string(),
            params: Some(json!({"missingProperty": "name"})),
        };
        let outcome = repair(&candidate, &schema, &CoverageIndex::new(), &[error], 3);
        assert_eq!(outcome.candidate, json!({"name": "xx"}));
        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(outcome.actions[0].action, RepairActionKind::FillRequiredDefault);
        assert!(!outcome.surrendered);
    }

    #[test]
    fn drops_extraneous_property() {
        let candidate = json!({"a": 1, "b": 2});
        let error = ProbeError {
            instance_path: String::new(),
            keyword: "additionalProperties".to_string(),
            canon_path: Some(String::new()),
            message: "extraneous property".to_string(),
            params: Some(json!({"additionalProperty": "b"})),
        };
        let outcome = repair(&candidate, &json!({}), &CoverageIndex::new(), &[error], 3);
        assert_eq!(outcome.candidate, json!({"a": 1}));
        assert_eq!(outcome.actions[0].action, RepairActionKind::DropExtraneousProperty);
    }

    #[test]
    fn coerces_string_to_pattern_witness() {
        let candidate = json!({"code": "xy"});
        let schema = json!({"properties": {"code": {"pattern": "^(?:a|bb|ccc)$"}}});
        let error = ProbeError {
            instance_path: "/code".to_string(),
            keyword: "pattern".to_string(),
            canon_path: Some("/properties/code".to_string()),
            message: "pattern mismatch".to_string(),
            params: None,
        };
        let outcome = repair(&candidate, &schema, &CoverageIndex::new(), &[error], 3);
        assert_eq!(outcome.candidate, json!({"code": "bb"}));
        assert_eq!(outcome.actions[0].action, RepairActionKind::CoercePatternEnum);
    }

    #[test]
    fn renames_inadmissible_property() {
        let candidate = json!({"x": 1});
        let mut index = CoverageIndex::new();
        index.register("#/obj", vec!["a".to_string(), "b".to_string()], &[]);
        let error = ProbeError {
            instance_path: "/x".to_string(),
            keyword: "propertyNames".to_string(),
            canon_path: Some("#/obj".to_string()),
            message: "inadmissible property name".to_string(),
            params: None,
        };
        let outcome = repair(&candidate, &json!({}), &index, &[error], 3);
        assert_eq!(outcome.candidate, json!({"a": 1}));
        assert_eq!(outcome.actions[0].action, RepairActionKind::RenameProperty);
    }

    #[test]
    fn unrepairable_keyword_surrenders_immediately() {
        let candidate = json!({"n": 5});
        let error = ProbeError {
            instance_path: "/n".to_string(),
            keyword: "minimum".to_string(),
            canon_path: Some("#/properties/n".to_string()),
            message: "below minimum".to_string(),
            params: None,
        };
        let outcome = repair(&candidate, &json!({}), &CoverageIndex::new(), &[error], 3);
        assert!(outcome.surrendered);
        assert!(outcome.actions.is_empty());
    }

    #[test]
    fn noop_edit_trips_guard_and_surrenders() {
        let candidate = json!({"name": "present"});
        let error = ProbeError {
            instance_path: String::new(),
            keyword: "required".to_string(),
            canon_path: Some(String::new()),
            message: "missing required property".to_string(),
            params: Some(json!({"missingProperty": "name"})),
        };
        let outcome = repair(&candidate, &json!({}), &CoverageIndex::new(), &[error], 3);
        assert!(outcome.surrendered);
        assert!(outcome.diagnostics.iter().any(|d| d.code == DiagnosticCode::RepairEvalGuardFail));
    }

    #[test]
    fn attempt_budget_is_clamped_to_three() {
        let candidate = json!({"a": 1, "b": 2, "c": 3, "d": 4});
        let errors: Vec<ProbeError> = ["a", "b", "c", "d"]
            .iter()
            .map(|k| ProbeError {
                instance_path: String::new(),
                keyword: "additionalProperties".to_string(),
                canon_path: Some(String::new()),
                message: "extraneous property".to_string(),
                params: Some(json!({"additionalProperty": k})),
            })
            .collect();
        let outcome = repair(&candidate, &json!({}), &CoverageIndex::new(), &errors, 10);
        assert_eq!(outcome.attempts_used, 3);
        assert!(outcome.surrendered);
    }
}
