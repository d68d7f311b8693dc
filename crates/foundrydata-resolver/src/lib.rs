//! The external `$ref` resolution registry the core consumes.
//!
//! Transport (HTTP fetching, disk cache I/O) is out of scope here: this
//! crate only defines the registry shape and the deterministic
//! `fingerprint()` the validator cache key and coverage report depend on.
//! Something upstream (the CLI, an embedding application) populates the
//! registry from a snapshot file or a live fetch and hands it to the
//! orchestrator.

use std::collections::BTreeMap;

use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One resolved external schema, keyed by its URI in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSchema {
    pub uri: String,
    pub schema: serde_json::Value,
    pub content_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
}

/// The dialects this core's normalizer and composer understand. An entry
/// whose dialect falls outside this set is skipped with
/// `RESOLVER_ADD_SCHEMA_SKIPPED_INCOMPATIBLE_DIALECT` rather than ingested
/// half-understood.
const COMPATIBLE_DIALECTS: &[&str] = &[
    "https://json-schema.org/draft/2020-12/schema",
    "https://json-schema.org/draft/2019-09/schema",
    "https://spec.openapis.org/oas/3.1/schema-base",
];

/// Registry of externally-resolved schemas, keyed by URI.
///
/// Entries are kept in a `BTreeMap` so iteration order (and therefore the
/// fingerprint) never depends on insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResolutionRegistry {
    entries: BTreeMap<String, ResolvedSchema>,
}

impl ResolutionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry`, or skip it with a diagnostic when its dialect is
    /// not one this core negotiates. Returns the diagnostic when skipped.
    pub fn add_schema(&mut self, entry: ResolvedSchema) -> Option<Envelope> {
        if let Some(dialect) = &entry.dialect {
            if !COMPATIBLE_DIALECTS.contains(&dialect.as_str()) {
                return Some(Envelope::without_details(
                    DiagnosticCode::ResolverAddSchemaSkippedIncompatibleDialect,
                    entry.uri.clone(),
                    Phase::Normalize,
                ));
            }
        }
        self.entries.insert(entry.uri.clone(), entry);
        None
    }

    #[must_use]
    pub fn get(&self, uri: &str) -> Option<&ResolvedSchema> {
        self.entries.get(uri)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deterministic fingerprint over the registry contents:
    /// `sha256(join("\n", sort("uri SP contentHash")))`, or `"0"` when
    /// empty. Feeds the validator cache key so a changed external schema
    /// invalidates cached compilations without touching the schema hash.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        if self.entries.is_empty() {
            return "0".to_string();
        }
        let mut lines: Vec<String> = self
            .entries
            .values()
            .map(|e| format!("{} {}", e.uri, e.content_hash))
            .collect();
        lines.sort();
        let joined = lines.join("\n");
        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hex::encode(hasher.finalize())
    }
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        use std::fmt::Write;
        bytes.as_ref().iter().fold(String::new(), |mut acc, b| {
            let _ = write!(acc, "{b:02x}");
            acc
        })
    }
}
