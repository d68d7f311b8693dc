use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DiagnosticCode, Phase};

/// A single diagnostic emitted by a phase.
///
/// `details`, when present, must not itself contain a `canonPath` key —
/// that key lives only at the envelope level. [`Envelope::new`] enforces
/// this so no caller can construct a shadowing envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: DiagnosticCode,
    #[serde(rename = "canonPath")]
    pub canon_path: String,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("details payload for {0} shadows the envelope-level canonPath key")]
    CanonPathShadowed(DiagnosticCode),
}

impl Envelope {
    pub fn new(
        code: DiagnosticCode,
        canon_path: impl Into<String>,
        phase: Phase,
        details: Option<Value>,
    ) -> Result<Self, EnvelopeError> {
        if let Some(Value::Object(map)) = &details {
            if map.contains_key("canonPath") {
                return Err(EnvelopeError::CanonPathShadowed(code));
            }
        }
        Ok(Self {
            code,
            canon_path: canon_path.into(),
            phase,
            details,
        })
    }

    #[must_use]
    pub fn without_details(code: DiagnosticCode, canon_path: impl Into<String>, phase: Phase) -> Self {
        Self {
            code,
            canon_path: canon_path.into(),
            phase,
            details: None,
        }
    }
}

/// An append-only stream of envelopes. Diagnostics are ordered by phase
/// then by emission order within the phase; this bus never reorders or
/// removes entries, it only appends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticsBus {
    envelopes: Vec<Envelope>,
}

impl DiagnosticsBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, envelope: Envelope) {
        self.envelopes.push(envelope);
    }

    pub fn extend(&mut self, envelopes: impl IntoIterator<Item = Envelope>) {
        self.envelopes.extend(envelopes);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Envelope] {
        &self.envelopes
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Envelope> {
        self.envelopes
    }

    #[must_use]
    pub fn has_fatal_unsat(&self) -> bool {
        self.envelopes.iter().any(|e| e.code.is_fatal_unsat())
    }

    #[must_use]
    pub fn by_phase(&self, phase: Phase) -> Vec<&Envelope> {
        self.envelopes.iter().filter(|e| e.phase == phase).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_shadowed_canon_path_in_details() {
        let err = Envelope::new(
            DiagnosticCode::RegexComplexityCapped,
            "/properties/name",
            Phase::Compose,
            Some(json!({"canonPath": "/oops", "limit": 512})),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EnvelopeError::CanonPathShadowed(DiagnosticCode::RegexComplexityCapped)
        );
    }

    #[test]
    fn accepts_details_without_canon_path() {
        let envelope = Envelope::new(
            DiagnosticCode::RegexComplexityCapped,
            "/properties/name",
            Phase::Compose,
            Some(json!({"limit": 512, "observed": 600})),
        )
        .unwrap();
        assert_eq!(envelope.canon_path, "/properties/name");
    }

    #[test]
    fn bus_preserves_append_order() {
        let mut bus = DiagnosticsBus::new();
        bus.push(Envelope::without_details(
            DiagnosticCode::DefsTargetMissing,
            "/$defs/a",
            Phase::Normalize,
        ));
        bus.push(Envelope::without_details(
            DiagnosticCode::UnsatRequiredPnames,
            "/properties/b",
            Phase::Compose,
        ));
        assert!(bus.has_fatal_unsat());
        assert_eq!(bus.by_phase(Phase::Normalize).len(), 1);
        assert_eq!(bus.as_slice().len(), 2);
    }
}
