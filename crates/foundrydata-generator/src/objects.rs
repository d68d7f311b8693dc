//! Object synthesis (§4.5): required-first/sorted-optional key order,
//! and the AP:false must-cover rule — a required key outside the
//! coverage intersection is dropped, never emitted in violation of
//! `additionalProperties:false`.

use foundrydata_composer::CoverageIndex;
use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};

use crate::ordering::order_keys;

pub struct ObjectPlan {
    /// Keys to synthesize a value for, in emission order.
    pub keys: Vec<String>,
    pub diagnostics: Vec<Envelope>,
}

/// Decide which keys an AP:false (or unconstrained) object node emits.
/// `declared` are the schema's own `properties` keys; `required` is the
/// node's `required` list. When `ap_false` and the coverage index has
/// this node registered, any required key the index can't admit is
/// silently dropped and recorded via `REPAIR_PNAMES_PATTERN_ENUM` — the
/// same code repair uses for a coercion-style edit, since dropping a
/// required key here is the generation-time counterpart of that safe
/// edit, not a new kind of repair.
#[must_use]
pub fn plan_object_keys(
    canon_path: &str,
    declared: &[String],
    required: &[String],
    ap_false: bool,
    coverage_index: &CoverageIndex,
) -> ObjectPlan {
    let mut diagnostics = Vec::new();
    let mut effective_required = Vec::with_capacity(required.len());

    for key in required {
        if ap_false && coverage_index.is_registered(canon_path) && !coverage_index.has(canon_path, key) {
            diagnostics.push(
                Envelope::new(
                    DiagnosticCode::RepairPnamesPatternEnum,
                    canon_path.to_string(),
                    Phase::Generate,
                    Some(serde_json::json!({"droppedRequiredKey": key})),
                )
                .expect("details never shadow canonPath"),
            );
            continue;
        }
        effective_required.push(key.clone());
    }

    let optional: Vec<String> = declared
        .iter()
        .filter(|k| !required.contains(k))
        .filter(|k| !ap_false || !coverage_index.is_registered(canon_path) || coverage_index.has(canon_path, k))
        .cloned()
        .collect();

    ObjectPlan {
        keys: order_keys(&effective_required, &optional),
        diagnostics,
    }
}
