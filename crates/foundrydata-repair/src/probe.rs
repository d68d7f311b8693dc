//! The minimal oracle-error shape repair reasons over. The orchestrator
//! translates whatever the concrete validator oracle returns into these
//! before calling into this crate — repair never talks to an oracle
//! directly, so it stays testable without one.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeError {
    /// JSON Pointer (no leading `#`) into the failing instance.
    pub instance_path: String,
    /// The schema keyword that rejected the instance at this path
    /// (`"required"`, `"pattern"`, `"additionalProperties"`, …).
    pub keyword: String,
    /// Canonical schema pointer the keyword fired from, when known.
    #[serde(rename = "canonPath", skip_serializing_if = "Option::is_none")]
    pub canon_path: Option<String>,
    pub message: String,
    /// Keyword-specific payload (e.g. `{"missingProperty": "..."}` for
    /// `required`, `{"additionalProperty": "..."}` for
    /// `additionalProperties`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}
