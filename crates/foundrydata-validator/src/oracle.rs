//! The `SourceOracle` seam (§4.7, §1 "a specific validator engine"): the
//! core never imports `jsonschema` types outside this module. Everything
//! upstream talks in terms of [`ProbeError`] and [`foundrydata_diagnostics::Envelope`].

use std::sync::Arc;

use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};
use foundrydata_repair::ProbeError;
use foundrydata_utils::error::OracleInstanceKind;
use foundrydata_utils::FoundryError;
use jsonschema::Validator;
use serde_json::Value;

use crate::cache::ValidatorCache;
use crate::key::ValidatorCacheKey;

/// Outcome of validating one instance against a compiled schema.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub probe_errors: Vec<ProbeError>,
}

/// The contract this crate binds to a concrete engine. An embedding
/// application could swap in a different oracle by implementing this
/// trait; the pipeline itself only ever depends on it, not on
/// `jsonschema` directly.
pub trait SourceOracle: Send + Sync {
    /// Compile `schema` (or reuse a cached compile for `key`), then
    /// validate `instance` against it.
    fn validate(&self, key: &ValidatorCacheKey, schema: &Value, instance: &Value) -> Result<ValidationReport, Envelope>;
}

/// The concrete oracle binding: the `jsonschema` crate, behind an LRU
/// cache of compiled validators.
#[derive(Default)]
pub struct JsonschemaOracle {
    cache: ValidatorCache,
}

impl JsonschemaOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn compile(&self, key: &ValidatorCacheKey, schema: &Value) -> Result<Arc<Validator>, Envelope> {
        if let Some(cached) = self.cache.get(key) {
            return Ok(cached);
        }

        let validator = jsonschema::validator_for(schema).map_err(|err| {
            let message = err.to_string();
            let code = if is_internal_ref_missing(&message) {
                DiagnosticCode::SchemaInternalRefMissing
            } else {
                DiagnosticCode::ValidationCompileError
            };
            Envelope::new(
                code,
                err.schema_path.to_string(),
                Phase::Validate,
                Some(serde_json::json!({"reason": message})),
            )
            .expect("details never shadow canonPath")
        })?;

        let validator = Arc::new(validator);
        self.cache.insert(key, validator.clone());
        Ok(validator)
    }
}

impl SourceOracle for JsonschemaOracle {
    fn validate(&self, key: &ValidatorCacheKey, schema: &Value, instance: &Value) -> Result<ValidationReport, Envelope> {
        let validator = self.compile(key, schema)?;
        let probe_errors: Vec<ProbeError> = validator.iter_errors(instance).map(translate_error).collect();
        Ok(ValidationReport {
            is_valid: probe_errors.is_empty(),
            probe_errors,
        })
    }
}

/// `jsonschema`'s own compile-time error messages for an unresolvable
/// internal `$ref` mention the pointer and "not found" / "Unresolvable";
/// match on that to split `SCHEMA_INTERNAL_REF_MISSING` out of the
/// broader `VALIDATION_COMPILE_ERROR` bucket.
fn is_internal_ref_missing(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("unresolvable") || (lower.contains("$ref") && lower.contains("not found"))
}

/// Best-effort translation of a `jsonschema` validation error into the
/// minimal, engine-agnostic [`ProbeError`] shape repair reasons over. The
/// keyword is read off the tail of `schema_path` (every JSON Schema
/// validator's error path ends in the keyword that rejected the
/// instance); any quoted token in the message is carried as the
/// keyword-specific detail, mirroring how AJV reports `missingProperty`
/// / `additionalProperty`.
fn translate_error(error: jsonschema::ValidationError<'_>) -> ProbeError {
    let message = error.to_string();
    let schema_path = error.schema_path.to_string();
    let keyword = schema_path.rsplit('/').next().filter(|s| !s.is_empty()).unwrap_or("unknown").to_string();
    let instance_path = error.instance_path.to_string();

    let params = quoted_token(&message).map(|token| match keyword.as_str() {
        "required" => serde_json::json!({"missingProperty": token}),
        "additionalProperties" => serde_json::json!({"additionalProperty": token}),
        _ => serde_json::json!({"value": token}),
    });

    ProbeError {
        instance_path,
        keyword,
        canon_path: Some(schema_path),
        message,
        params,
    }
}

fn quoted_token(message: &str) -> Option<String> {
    let start = message.find('"')?;
    let rest = &message[start + 1..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// §4.7: the oracle must report the same flag set compiling the
/// *source* schema as it does the *planning* (effective, composer-rewritten)
/// schema. A mismatch is a fail-fast `AJV_FLAGS_MISMATCH`.
pub fn check_flags_consistency(source_flags: &[String], planning_flags: &[String], canon_path: &str) -> Option<Envelope> {
    if source_flags == planning_flags {
        return None;
    }
    let mut diffs: Vec<String> = source_flags
        .iter()
        .filter(|f| !planning_flags.contains(f))
        .chain(planning_flags.iter().filter(|f| !source_flags.contains(f)))
        .cloned()
        .collect();
    diffs.sort();
    diffs.dedup();

    Some(
        Envelope::new(
            DiagnosticCode::AjvFlagsMismatch,
            canon_path.to_string(),
            Phase::Validate,
            Some(serde_json::json!({"instance": instance_kind_label(OracleInstanceKind::Both), "diffs": diffs})),
        )
        .expect("details never shadow canonPath"),
    )
}

fn instance_kind_label(kind: OracleInstanceKind) -> &'static str {
    match kind {
        OracleInstanceKind::Source => "source",
        OracleInstanceKind::Planning => "planning",
        OracleInstanceKind::Both => "both",
    }
}

/// Bridge a fail-fast oracle envelope into the workspace's aborting error
/// taxonomy, for callers that need to stop the run rather than record a
/// diagnostic and continue.
#[must_use]
pub fn envelope_to_foundry_error(envelope: &Envelope, schema_hash: &str) -> Option<FoundryError> {
    match envelope.code {
        DiagnosticCode::ValidationCompileError => Some(FoundryError::ValidationCompileError {
            schema_hash: schema_hash.to_string(),
            reason: envelope
                .details
                .as_ref()
                .and_then(|d| d.get("reason"))
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
        }),
        DiagnosticCode::SchemaInternalRefMissing => Some(FoundryError::SchemaInternalRefMissing {
            pointer: envelope.canon_path.clone(),
            canon_path: envelope.canon_path.clone(),
        }),
        DiagnosticCode::AjvFlagsMismatch => Some(FoundryError::AjvFlagsMismatch {
            instance: OracleInstanceKind::Both,
            diffs: envelope
                .details
                .as_ref()
                .and_then(|d| d.get("diffs"))
                .and_then(Value::as_array)
                .map(|arr| arr.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_instance_reports_no_probe_errors() {
        let oracle = JsonschemaOracle::new();
        let schema = json!({"type": "object", "required": ["name"]});
        let key = ValidatorCacheKey::new(&schema, &[], "sub", "0");
        let report = oracle.validate(&key, &schema, &json!({"name": "a"})).unwrap();
        assert!(report.is_valid);
        assert!(report.probe_errors.is_empty());
    }

    #[test]
    fn missing_required_property_is_reported() {
        let oracle = JsonschemaOracle::new();
        let schema = json!({"type": "object", "required": ["name"], "additionalProperties": true});
        let key = ValidatorCacheKey::new(&schema, &[], "sub", "0");
        let report = oracle.validate(&key, &schema, &json!({})).unwrap();
        assert!(!report.is_valid);
        assert!(report.probe_errors.iter().any(|e| e.keyword == "required"));
    }

    #[test]
    fn compile_error_is_classified_as_fail_fast() {
        let oracle = JsonschemaOracle::new();
        let schema = json!({"type": "not-a-real-type"});
        let key = ValidatorCacheKey::new(&schema, &[], "sub", "0");
        let err = oracle.validate(&key, &schema, &json!({})).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::ValidationCompileError);
    }

    #[test]
    fn matching_flags_report_no_mismatch() {
        let a = vec!["strict".to_string()];
        assert!(check_flags_consistency(&a, &a, "#").is_none());
    }

    #[test]
    fn differing_flags_report_a_mismatch_with_diffs() {
        let source = vec!["strict".to_string()];
        let planning = vec!["lenient".to_string()];
        let envelope = check_flags_consistency(&source, &planning, "#").unwrap();
        assert_eq!(envelope.code, DiagnosticCode::AjvFlagsMismatch);
    }
}
