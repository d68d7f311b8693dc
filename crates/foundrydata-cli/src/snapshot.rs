//! Reads the NDJSON external-$ref snapshot format (§6 External
//! Interfaces): a `{fingerprint}` header line followed by one
//! `{uri, schema, contentHash?, dialect?}` entry per line. Live fetching
//! is out of scope here; this only loads what some other step already
//! resolved to disk.

use anyhow::{Context, bail};
use camino::Utf8Path;
use foundrydata_resolver::{ResolutionRegistry, ResolvedSchema};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Header {
    fingerprint: String,
}

#[derive(Debug, Deserialize)]
struct Entry {
    uri: String,
    schema: serde_json::Value,
    #[serde(default)]
    content_hash: Option<String>,
    #[serde(default)]
    dialect: Option<String>,
}

/// Parse a snapshot's NDJSON content into a populated registry, warning
/// (via the returned `Vec<String>`) for any entry skipped due to an
/// incompatible dialect. Returns an error if the trailing fingerprint
/// doesn't match what the loaded entries hash to — the snapshot was
/// edited or truncated after being written.
pub fn load_snapshot(content: &str) -> anyhow::Result<(ResolutionRegistry, Vec<String>)> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header_line = lines.next().context("snapshot is empty")?;
    let header: Header = serde_json::from_str(header_line).context("snapshot header is not valid JSON")?;

    let mut registry = ResolutionRegistry::new();
    let mut warnings = Vec::new();
    for line in lines {
        let entry: Entry = serde_json::from_str(line).context("snapshot entry is not valid JSON")?;
        let content_hash = entry.content_hash.unwrap_or_else(|| {
            foundrydata_utils::hashing::jcs_blake3_hex(&entry.schema).unwrap_or_default()
        });
        let resolved = ResolvedSchema {
            uri: entry.uri,
            schema: entry.schema,
            content_hash,
            meta: None,
            dialect: entry.dialect,
        };
        if let Some(envelope) = registry.add_schema(resolved) {
            warnings.push(format!("{}: {}", envelope.canon_path, envelope.code));
        }
    }

    if registry.fingerprint() != header.fingerprint {
        bail!(
            "snapshot fingerprint mismatch: header says {} but loaded entries hash to {}",
            header.fingerprint,
            registry.fingerprint()
        );
    }

    Ok((registry, warnings))
}

/// Load a snapshot from `path`.
pub fn load_snapshot_file(path: &Utf8Path) -> anyhow::Result<(ResolutionRegistry, Vec<String>)> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading snapshot file {path}"))?;
    load_snapshot(&content)
}
