use foundrydata_diagnostics::{DiagnosticCode, Envelope, Phase};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum RegexError {
    #[error("pattern does not compile: {0}")]
    CompileError(String),
}

/// Raw structural properties of a regex source string, gathered without
/// fully compiling it: whether it is fully anchored, and whether it uses
/// constructs the Rust regex engine (and therefore this generator) can
/// never support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexScan {
    pub anchored_start: bool,
    pub anchored_end: bool,
    pub has_look_around: bool,
    pub has_back_reference: bool,
    pub complexity_capped: bool,
}

/// Scan `source` for anchoring and for lookaround/backreference syntax.
/// This never compiles the pattern — it is a lexical pre-check so a
/// `REGEX_COMPILE_ERROR` diagnostic can carry a precise reason before the
/// (possibly expensive) compile is attempted.
#[must_use]
pub fn scan_regex_source(source: &str) -> RegexScan {
    let anchored_start = source.starts_with('^');
    let anchored_end = source.ends_with('$') && !source.ends_with("\\$");
    let has_look_around = contains_lookaround(source);
    let has_back_reference = contains_backreference(source);
    RegexScan {
        anchored_start,
        anchored_end,
        has_look_around,
        has_back_reference,
        complexity_capped: false,
    }
}

fn contains_lookaround(source: &str) -> bool {
    const MARKERS: &[&str] = &["(?=", "(?!", "(?<=", "(?<!"];
    MARKERS.iter().any(|m| source.contains(m))
}

fn contains_backreference(source: &str) -> bool {
    let bytes = source.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            let next = bytes[i + 1];
            if next.is_ascii_digit() && next != b'0' {
                return true;
            }
            if next == b'k' && source[i..].starts_with("\\k<") {
                return true;
            }
            i += 2;
            continue;
        }
        i += 1;
    }
    false
}

/// Attempt to compile `source` with the Rust regex engine, returning a
/// `REGEX_COMPILE_ERROR` diagnostic on failure rather than propagating
/// the error — compile failures are a composer-time fact about the
/// schema, not a programming error.
pub fn try_compile(source: &str, canon_path: &str) -> Result<regex::Regex, Envelope> {
    regex::Regex::new(source).map_err(|e| {
        Envelope::new(
            DiagnosticCode::RegexCompileError,
            canon_path.to_string(),
            Phase::Compose,
            Some(serde_json::json!({ "pattern": source, "message": e.to_string() })),
        )
        .expect("REGEX_COMPILE_ERROR details never shadow canonPath")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_full_anchoring() {
        let scan = scan_regex_source("^(?:ab|cd)$");
        assert!(scan.anchored_start && scan.anchored_end);
    }

    #[test]
    fn detects_lookaround() {
        assert!(scan_regex_source("^(?=foo)bar$").has_look_around);
        assert!(!scan_regex_source("^foobar$").has_look_around);
    }

    #[test]
    fn detects_backreference() {
        assert!(scan_regex_source(r"^(a)\1$").has_back_reference);
        assert!(!scan_regex_source(r"^(a)b$").has_back_reference);
    }

    #[test]
    fn compile_error_becomes_diagnostic() {
        let err = try_compile("^(unclosed", "/properties/name/pattern").unwrap_err();
        assert_eq!(err.code, DiagnosticCode::RegexCompileError);
    }
}
