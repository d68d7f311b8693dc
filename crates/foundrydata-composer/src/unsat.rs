//! Provable infeasibility checks (§4.3 UNSAT catalogue). Each function
//! inspects one object/numeric/contains node and returns the fatal
//! diagnostics it can prove; absence of a diagnostic never claims the
//! node is satisfiable, only that this check found no proof otherwise.

use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};
use foundrydata_ptrmap::{CanonPointer, PtrMap};
use serde_json::Value;

use crate::coverage_index::CoverageIndex;

fn envelope(code: DiagnosticCode, canon_path: &str, details: Value) -> Envelope {
    Envelope::new(code, canon_path.to_string(), Phase::Compose, Some(details))
        .expect("UNSAT diagnostic details never shadow canonPath")
}

/// Checks every `required` key against the object's AP:false coverage
/// index and/or its `propertyNames` pattern, when either constrains
/// admissible names. When the AP:false node traces back (via `ptr_map`)
/// to a normalizer-rewritten `propertyNames.enum`, the more specific
/// `UNSAT_REQUIRED_VS_PROPERTYNAMES` is reported instead of the generic
/// `UNSAT_REQUIRED_AP_FALSE`.
pub fn check_required_admissibility(
    canon_path: &str,
    required: &[String],
    ap_false: bool,
    property_names_pattern: Option<&regex::Regex>,
    coverage_index: &CoverageIndex,
    ptr_map: &PtrMap,
) -> Vec<Envelope> {
    let mut out = Vec::new();
    let from_property_names_rewrite = CanonPointer::parse(canon_path.to_string())
        .ok()
        .and_then(|p| ptr_map.original_of(&p).cloned())
        .is_some_and(|original| original.as_str().ends_with("/propertyNames"));

    for key in required {
        if let Some(pattern) = property_names_pattern {
            if !pattern.is_match(key) {
                out.push(envelope(
                    DiagnosticCode::UnsatRequiredPnames,
                    canon_path,
                    serde_json::json!({"propertyName": key}),
                ));
                continue;
            }
        }
        if ap_false && !coverage_index.has(canon_path, key) {
            let code = if from_property_names_rewrite {
                DiagnosticCode::UnsatRequiredVsPropertynames
            } else {
                DiagnosticCode::UnsatRequiredApFalse
            };
            out.push(envelope(code, canon_path, serde_json::json!({"propertyName": key})));
        }
    }
    out
}

/// `UNSAT_AP_FALSE_EMPTY_COVERAGE`: an AP:false node with no declared
/// properties and no pattern coverage can admit no keys at all; fires
/// only when the schema actually demands at least one key.
pub fn check_ap_false_empty_coverage(
    canon_path: &str,
    ap_false: bool,
    has_any_declared_or_pattern: bool,
    min_properties: Option<u64>,
    required_nonempty: bool,
) -> Option<Envelope> {
    if !ap_false || has_any_declared_or_pattern {
        return None;
    }
    let demands_a_key = required_nonempty || min_properties.is_some_and(|m| m > 0);
    if !demands_a_key {
        return None;
    }
    Some(envelope(
        DiagnosticCode::UnsatApFalseEmptyCoverage,
        canon_path,
        serde_json::json!({"minProperties": min_properties}),
    ))
}

/// `UNSAT_MINPROPERTIES_VS_COVERAGE`: `minProperties` exceeds the number
/// of names the (proven-finite) coverage index can ever admit.
pub fn check_min_properties_vs_coverage(
    canon_path: &str,
    min_properties: Option<u64>,
    coverage_index: &CoverageIndex,
) -> Option<Envelope> {
    let min_properties = min_properties?;
    let finite = coverage_index.enumerate(canon_path)?;
    if (finite.len() as u64) < min_properties {
        return Some(envelope(
            DiagnosticCode::UnsatMinpropertiesVsCoverage,
            canon_path,
            serde_json::json!({"minProperties": min_properties, "admissibleCount": finite.len()}),
        ));
    }
    None
}

/// `UNSAT_NUMERIC_BOUNDS`: an empty numeric range, or an integer domain
/// with no integer in `(exclusiveMinimum, exclusiveMaximum)`/`[minimum,
/// maximum]`.
pub fn check_numeric_bounds(
    canon_path: &str,
    is_integer: bool,
    minimum: Option<f64>,
    maximum: Option<f64>,
    exclusive_minimum: Option<f64>,
    exclusive_maximum: Option<f64>,
) -> Option<Envelope> {
    let lo = exclusive_minimum.map_or(minimum, |e| Some(minimum.map_or(e, |m| m.max(e))));
    let hi = exclusive_maximum.map_or(maximum, |e| Some(maximum.map_or(e, |m| m.min(e))));
    let (Some(lo), Some(hi)) = (lo, hi) else {
        return None;
    };
    let lo_exclusive = exclusive_minimum.is_some();
    let hi_exclusive = exclusive_maximum.is_some();

    if lo > hi || (lo == hi && (lo_exclusive || hi_exclusive)) {
        return Some(envelope(
            DiagnosticCode::UnsatNumericBounds,
            canon_path,
            serde_json::json!({"reason": "rangeEmpty", "minimum": lo, "maximum": hi}),
        ));
    }

    if is_integer {
        let first_int = if lo_exclusive { lo.floor() + 1.0 } else { lo.ceil() };
        let within_upper = if hi_exclusive { first_int < hi } else { first_int <= hi };
        if !within_upper {
            return Some(envelope(
                DiagnosticCode::UnsatNumericBounds,
                canon_path,
                serde_json::json!({"reason": "integerDomainEmpty", "minimum": lo, "maximum": hi}),
            ));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_vs_property_names_rewrite_is_reported_specifically() {
        let mut ptr_map = PtrMap::new();
        let canon = CanonPointer::root().child("additionalProperties");
        let original = CanonPointer::root().child("propertyNames");
        ptr_map.insert(canon.clone(), original);

        let mut index = CoverageIndex::new();
        index.register(canon.as_str(), vec!["allowed".to_string()], &[]);

        let envelopes = check_required_admissibility(
            canon.as_str(),
            &["forbidden".to_string()],
            true,
            None,
            &index,
            &ptr_map,
        );
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].code, DiagnosticCode::UnsatRequiredVsPropertynames);
    }

    #[test]
    fn required_vs_ap_false_without_rewrite_uses_generic_code() {
        let ptr_map = PtrMap::new();
        let mut index = CoverageIndex::new();
        index.register("#/additionalProperties", vec!["id".to_string()], &[]);

        let envelopes = check_required_admissibility(
            "#/additionalProperties",
            &["missing".to_string()],
            true,
            None,
            &index,
            &ptr_map,
        );
        assert_eq!(envelopes[0].code, DiagnosticCode::UnsatRequiredApFalse);
    }

    #[test]
    fn empty_coverage_fires_only_when_a_key_is_demanded() {
        assert!(check_ap_false_empty_coverage("#/x", true, false, None, false).is_none());
        assert!(check_ap_false_empty_coverage("#/x", true, false, Some(1), false).is_some());
        assert!(check_ap_false_empty_coverage("#/x", true, true, Some(1), false).is_none());
    }

    #[test]
    fn numeric_bounds_detects_empty_range() {
        let result = check_numeric_bounds("#/n", false, Some(10.0), Some(5.0), None, None);
        assert!(result.is_some());
        assert_eq!(result.unwrap().code, DiagnosticCode::UnsatNumericBounds);
    }

    #[test]
    fn numeric_bounds_detects_empty_integer_domain() {
        let result = check_numeric_bounds("#/n", true, Some(1.1), Some(1.9), None, None);
        assert!(result.is_some());
    }

    #[test]
    fn numeric_bounds_allows_satisfiable_integer_range() {
        let result = check_numeric_bounds("#/n", true, Some(1.1), Some(2.9), None, None);
        assert!(result.is_none());
    }
}
