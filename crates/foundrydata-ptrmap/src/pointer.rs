use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical JSON Pointer: `#` for the schema root, or `#/seg/seg/...`
/// with each segment `~1`/`~0`-escaped per RFC 6901.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonPointer(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PointerError {
    #[error("pointer {0:?} must start with '#'")]
    MissingHashPrefix(String),
}

impl CanonPointer {
    pub const ROOT: &'static str = "#";

    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    pub fn parse(raw: impl Into<String>) -> Result<Self, PointerError> {
        let raw = raw.into();
        if !raw.starts_with('#') {
            return Err(PointerError::MissingHashPrefix(raw));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    /// Append a raw (unescaped) segment, escaping `~` and `/` per RFC 6901.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let escaped = segment.replace('~', "~0").replace('/', "~1");
        let base = if self.is_root() { "" } else { self.0.as_str() };
        Self(format!("{base}/{escaped}"))
    }

    /// Decode `#` and the leading prefix, returning the unescaped
    /// segments under it. The root pointer decodes to an empty vec.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        if self.is_root() {
            return Vec::new();
        }
        self.0[2..]
            .split('/')
            .map(|s| s.replace("~1", "/").replace("~0", "~"))
            .collect()
    }

    /// `true` iff `self` is `prefix` or a descendant of it.
    #[must_use]
    pub fn has_prefix(&self, prefix: &CanonPointer) -> bool {
        if prefix.is_root() {
            return true;
        }
        self.0 == prefix.0 || self.0.starts_with(&format!("{}/", prefix.0))
    }
}

impl fmt::Display for CanonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CanonPointer> for String {
    fn from(p: CanonPointer) -> Self {
        p.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_escapes_tilde_and_slash() {
        let root = CanonPointer::root();
        let child = root.child("a/b~c");
        assert_eq!(child.as_str(), "#/a~1b~0c");
    }

    #[test]
    fn segments_round_trip_through_child() {
        let p = CanonPointer::root().child("properties").child("a/b");
        assert_eq!(p.segments(), vec!["properties", "a/b"]);
    }

    #[test]
    fn has_prefix_matches_self_and_descendants() {
        let root = CanonPointer::root();
        let props = root.child("properties");
        let name = props.child("name");
        assert!(name.has_prefix(&props));
        assert!(name.has_prefix(&root));
        assert!(!props.has_prefix(&name));
    }

    #[test]
    fn parse_rejects_missing_hash() {
        assert!(CanonPointer::parse("/properties/a").is_err());
        assert!(CanonPointer::parse("#/properties/a").is_ok());
    }
}
