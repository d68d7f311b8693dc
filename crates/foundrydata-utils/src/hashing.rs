//! Deterministic content hashing: JSON canonicalization (RFC 8785) plus
//! BLAKE3, the same pairing the teacher uses for receipt/content hashes.
//!
//! This crate exposes the primitive only; the *meaning* of the hash
//! (target id, resolver fingerprint, validator cache key) lives in the
//! crate that owns that concept.

use serde::Serialize;

/// Serialize `value` to JSON Canonicalization Scheme (RFC 8785) bytes.
///
/// Used wherever a stable byte representation is required before hashing
/// or hex-encoding, independent of field declaration order.
pub fn to_jcs_string<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let json_value = serde_json::to_value(value)?;
    let bytes = serde_json_canonicalizer::to_vec(&json_value)?;
    Ok(String::from_utf8(bytes)?)
}

/// BLAKE3 hex digest of raw bytes.
#[must_use]
pub fn blake3_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Canonicalize then hash in one step.
pub fn jcs_blake3_hex<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(blake3_hex(to_jcs_string(value)?.as_bytes()))
}
