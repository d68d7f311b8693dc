//! Pre-normalize external `$ref` resolution (§4.12, §6 "Resolver
//! (external)"). The registry itself is transport-agnostic; this module
//! is what the orchestrator uses it for — splicing resolved external
//! schemas in place of their `$ref` before the canonical normalize pass
//! ever sees them.

use foundrydata_config::Compat;
use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};
use foundrydata_resolver::ResolutionRegistry;
use foundrydata_utils::FoundryError;
use serde_json::Value;

/// Walk `schema`, splicing in every external `$ref` the registry can
/// resolve. A `$ref` is "external" when it doesn't start with `#` — an
/// internal JSON Pointer is left entirely to the normalizer.
///
/// In [`Compat::Strict`], an unresolved external ref is fail-fast (§7):
/// the caller aborts the run. In [`Compat::Lax`], it is left untouched
/// and recorded as a warning, letting downstream phases treat the
/// dangling `$ref` as an opaque unconstrained schema.
pub fn resolve_external_refs(
    schema: &Value,
    registry: &ResolutionRegistry,
    compat: Compat,
) -> Result<(Value, Vec<Envelope>), FoundryError> {
    let mut notes = Vec::new();
    let mut resolved = schema.clone();
    splice(&mut resolved, registry, compat, &mut notes)?;
    Ok((resolved, notes))
}

fn splice(
    value: &mut Value,
    registry: &ResolutionRegistry,
    compat: Compat,
    notes: &mut Vec<Envelope>,
) -> Result<(), FoundryError> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("$ref").cloned().as_ref() {
                if !target.starts_with('#') {
                    match registry.get(target) {
                        Some(resolved_schema) => {
                            *value = resolved_schema.schema.clone();
                            return splice(value, registry, compat, notes);
                        }
                        None => {
                            let canon_path = "#".to_string();
                            if matches!(compat, Compat::Strict) {
                                return Err(FoundryError::ExternalRefUnresolved {
                                    uri: target.clone(),
                                    canon_path,
                                });
                            }
                            notes.push(Envelope::without_details(
                                DiagnosticCode::ExternalRefUnresolved,
                                canon_path,
                                Phase::Normalize,
                            ));
                            return Ok(());
                        }
                    }
                }
            }
            for child in map.values_mut() {
                splice(child, registry, compat, notes)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                splice(item, registry, compat, notes)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundrydata_resolver::ResolvedSchema;
    use serde_json::json;

    #[test]
    fn splices_resolved_external_ref() {
        let mut registry = ResolutionRegistry::new();
        registry.add_schema(ResolvedSchema {
            uri: "https://example.com/address.json".to_string(),
            schema: json!({"type": "object", "properties": {"city": {"type": "string"}}}),
            content_hash: "deadbeef".to_string(),
            meta: None,
            dialect: None,
        });
        let schema = json!({
            "type": "object",
            "properties": {"home": {"$ref": "https://example.com/address.json"}}
        });
        let (resolved, notes) = resolve_external_refs(&schema, &registry, Compat::Strict).unwrap();
        assert!(notes.is_empty());
        assert_eq!(resolved["properties"]["home"]["properties"]["city"]["type"], json!("string"));
    }

    #[test]
    fn strict_mode_fails_fast_on_unresolved_ref() {
        let registry = ResolutionRegistry::new();
        let schema = json!({"$ref": "https://example.com/missing.json"});
        let result = resolve_external_refs(&schema, &registry, Compat::Strict);
        assert!(matches!(result, Err(FoundryError::ExternalRefUnresolved { .. })));
    }

    #[test]
    fn lax_mode_warns_and_leaves_ref_untouched() {
        let registry = ResolutionRegistry::new();
        let schema = json!({"$ref": "https://example.com/missing.json"});
        let (resolved, notes) = resolve_external_refs(&schema, &registry, Compat::Lax).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].code, DiagnosticCode::ExternalRefUnresolved);
        assert_eq!(resolved["$ref"], json!("https://example.com/missing.json"));
    }

    #[test]
    fn internal_pointer_refs_are_left_alone() {
        let registry = ResolutionRegistry::new();
        let schema = json!({"$ref": "#/$defs/thing"});
        let (resolved, notes) = resolve_external_refs(&schema, &registry, Compat::Strict).unwrap();
        assert!(notes.is_empty());
        assert_eq!(resolved, schema);
    }
}
