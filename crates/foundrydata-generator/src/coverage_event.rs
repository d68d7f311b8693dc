//! Coverage events emitted while constructing an instance (§4.5, §4.10).
//! Each event carries the same identity fields an accumulator resolves
//! against a target, so projection onto the coverage graph is a pure
//! function of the event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageDimension {
    Structure,
    Branches,
    Enum,
    Boundaries,
    Operations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageEvent {
    pub dimension: CoverageDimension,
    pub kind: String,
    #[serde(rename = "canonPath")]
    pub canon_path: String,
    #[serde(rename = "operationKey", default, skip_serializing_if = "Option::is_none")]
    pub operation_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl CoverageEvent {
    #[must_use]
    pub fn new(dimension: CoverageDimension, kind: &str, canon_path: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            dimension,
            kind: kind.to_string(),
            canon_path: canon_path.into(),
            operation_key: None,
            params,
        }
    }
}
