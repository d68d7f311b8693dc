//! The validator cache key (§4.7): `(schemaHash, engineMajor, engineClass,
//! sortedFlags, planOptionsSubKey, registryFingerprint)`. Two compiles of
//! the same schema only share a cache entry when every one of these
//! agrees — a changed resolver snapshot or a different plan sub-key
//! forces a fresh compile rather than silently reusing a stale one.

use foundrydata_utils::hashing::jcs_blake3_hex;
use serde_json::Value;

/// The oracle's major version and validation mode, reported by the
/// concrete adapter rather than inferred — lets a future non-`jsonschema`
/// oracle share the same cache shape.
pub const ENGINE_MAJOR: u32 = 0;
pub const ENGINE_CLASS: &str = "jsonschema-rs";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidatorCacheKey {
    pub schema_hash: String,
    pub engine_major: u32,
    pub engine_class: String,
    pub sorted_flags: Vec<String>,
    pub plan_options_sub_key: String,
    pub registry_fingerprint: String,
}

impl ValidatorCacheKey {
    #[must_use]
    pub fn new(schema: &Value, flags: &[&str], plan_options_sub_key: impl Into<String>, registry_fingerprint: impl Into<String>) -> Self {
        let mut sorted_flags: Vec<String> = flags.iter().map(|f| (*f).to_string()).collect();
        sorted_flags.sort();
        Self {
            schema_hash: jcs_blake3_hex(schema).unwrap_or_default(),
            engine_major: ENGINE_MAJOR,
            engine_class: ENGINE_CLASS.to_string(),
            sorted_flags,
            plan_options_sub_key: plan_options_sub_key.into(),
            registry_fingerprint: registry_fingerprint.into(),
        }
    }

    /// Flattened string form used as the cache map's key, so ordering of
    /// the struct fields never leaks into equality beyond what's encoded.
    #[must_use]
    pub fn as_cache_string(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.schema_hash,
            self.engine_major,
            self.engine_class,
            self.sorted_flags.join(","),
            self.plan_options_sub_key,
            self.registry_fingerprint,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_order_does_not_affect_the_key() {
        let schema = json!({"type": "object"});
        let a = ValidatorCacheKey::new(&schema, &["strict", "formats"], "sub", "0");
        let b = ValidatorCacheKey::new(&schema, &["formats", "strict"], "sub", "0");
        assert_eq!(a.as_cache_string(), b.as_cache_string());
    }

    #[test]
    fn different_schemas_hash_differently() {
        let a = ValidatorCacheKey::new(&json!({"type": "object"}), &[], "sub", "0");
        let b = ValidatorCacheKey::new(&json!({"type": "string"}), &[], "sub", "0");
        assert_ne!(a.schema_hash, b.schema_hash);
    }
}
