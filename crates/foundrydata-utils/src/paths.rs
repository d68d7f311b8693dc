//! Small path helpers shared by the resolver snapshot writer, the coverage
//! report writer, and the CLI.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// Create a directory and all its parents if missing; a no-op if it
/// already exists.
pub fn ensure_dir_all(path: &Utf8Path) -> io::Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e),
    }
}

/// Resolve `path` to an absolute `Utf8PathBuf` without requiring the path
/// to exist (unlike `fs::canonicalize`).
pub fn absolutize(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_default();
    Utf8PathBuf::from_path_buf(cwd)
        .unwrap_or_default()
        .join(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_all_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = Utf8Path::from_path(tmp.path()).unwrap().join("a/b/c");
        ensure_dir_all(&nested).unwrap();
        ensure_dir_all(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn absolutize_leaves_absolute_paths_unchanged() {
        let abs = Utf8Path::new("/tmp/foo");
        assert_eq!(absolutize(abs), abs.to_path_buf());
    }
}
