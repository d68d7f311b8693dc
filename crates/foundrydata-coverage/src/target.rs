//! The coverage target model (§3, §4.8): a discrete, addressable unit of
//! structural coverage, stably identified by a content-addressed hash of
//! its identity fields rather than by insertion order.

use foundrydata_utils::hashing::jcs_blake3_hex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageDimension {
    Structure,
    Branches,
    Enum,
    Boundaries,
    Operations,
}

/// The closed kind enumeration from §3. Kept as a string newtype rather
/// than a Rust enum so event `kind` strings emitted by the generator
/// (which doesn't depend on this crate) line up without a shared type.
pub const KNOWN_KINDS: &[&str] = &[
    "SCHEMA_NODE",
    "PROPERTY_PRESENT",
    "ONEOF_BRANCH",
    "ANYOF_BRANCH",
    "CONDITIONAL_PATH",
    "ENUM_VALUE_HIT",
    "NUMERIC_MIN_HIT",
    "NUMERIC_MAX_HIT",
    "STRING_MIN_LENGTH_HIT",
    "STRING_MAX_LENGTH_HIT",
    "ARRAY_MIN_ITEMS_HIT",
    "ARRAY_MAX_ITEMS_HIT",
    "OP_REQUEST_COVERED",
    "OP_RESPONSE_COVERED",
    "SCHEMA_REUSED_COVERED",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Active,
    Unreachable,
    /// `SCHEMA_REUSED_COVERED` only: diagnostic-only, never planned or
    /// counted toward a denominator.
    Deprecated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageTarget {
    pub id: String,
    pub dimension: CoverageDimension,
    pub kind: String,
    #[serde(rename = "canonPath")]
    pub canon_path: String,
    #[serde(rename = "operationKey", default, skip_serializing_if = "Option::is_none")]
    pub operation_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub status: TargetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polarity: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl CoverageTarget {
    #[must_use]
    pub fn new(dimension: CoverageDimension, kind: &str, canon_path: impl Into<String>, operation_key: Option<String>, params: Option<Value>) -> Self {
        let canon_path = canon_path.into();
        let id = compute_target_id(dimension, kind, &canon_path, operation_key.as_deref(), params.as_ref());
        let status = if kind == "SCHEMA_REUSED_COVERED" {
            TargetStatus::Deprecated
        } else {
            TargetStatus::Active
        };
        Self {
            id,
            dimension,
            kind: kind.to_string(),
            canon_path,
            operation_key,
            params,
            status,
            weight: None,
            polarity: None,
            meta: None,
        }
    }

    /// The identity key an emitted event resolves against — the same
    /// `(dimension, kind, canonPath, operationKey, paramsKey)` tuple
    /// [`compute_target_id`] hashes, kept as a readable string for index
    /// lookups that don't need the hash itself.
    #[must_use]
    pub fn identity_key(&self) -> String {
        identity_key(self.dimension, &self.kind, &self.canon_path, self.operation_key.as_deref(), self.params.as_ref())
    }

    #[must_use]
    pub fn is_planned(&self) -> bool {
        self.meta.as_ref().and_then(|m| m.get("planned")).and_then(Value::as_bool).unwrap_or(true)
    }

    pub fn set_planned(&mut self, planned: bool) {
        let mut map = self.meta.take().and_then(|v| v.as_object().cloned()).unwrap_or_default();
        map.insert("planned".to_string(), Value::Bool(planned));
        self.meta = Some(Value::Object(map));
    }
}

fn params_key(params: Option<&Value>) -> String {
    params.map_or_else(String::new, |v| jsonschema_free_canon(v))
}

/// A dependency-free canonical string for a params payload: serde_json's
/// `Value` already orders object keys the way `BTreeMap` would once
/// parsed with `preserve_order` disabled, so a plain `to_string()` is
/// stable across runs within this workspace's build configuration.
fn jsonschema_free_canon(value: &Value) -> String {
    value.to_string()
}

#[must_use]
pub fn identity_key(
    dimension: CoverageDimension,
    kind: &str,
    canon_path: &str,
    operation_key: Option<&str>,
    params: Option<&Value>,
) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        serde_json::to_string(&dimension).unwrap_or_default(),
        kind,
        canon_path,
        operation_key.unwrap_or(""),
        params_key(params),
    )
}

/// The generator's [`foundrydata_generator::CoverageDimension`] and this
/// crate's [`CoverageDimension`] are deliberately separate types (the
/// generator doesn't depend on this crate) but share the same variants;
/// bridge them explicitly rather than coupling the two crates.
#[must_use]
pub fn from_generator_dimension(dimension: foundrydata_generator::CoverageDimension) -> CoverageDimension {
    match dimension {
        foundrydata_generator::CoverageDimension::Structure => CoverageDimension::Structure,
        foundrydata_generator::CoverageDimension::Branches => CoverageDimension::Branches,
        foundrydata_generator::CoverageDimension::Enum => CoverageDimension::Enum,
        foundrydata_generator::CoverageDimension::Boundaries => CoverageDimension::Boundaries,
        foundrydata_generator::CoverageDimension::Operations => CoverageDimension::Operations,
    }
}

#[must_use]
pub fn compute_target_id(dimension: CoverageDimension, kind: &str, canon_path: &str, operation_key: Option<&str>, params: Option<&Value>) -> String {
    let key = identity_key(dimension, kind, canon_path, operation_key, params);
    jcs_blake3_hex(&key).unwrap_or(key)
}
