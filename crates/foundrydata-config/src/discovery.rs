//! Locating the project file. Walks upward from a starting directory
//! looking for `foundrydata.toml`, the way the teacher's discovery module
//! walks up from the invocation directory looking for its own project
//! file, stopping at the first match or the filesystem root.

use camino::{Utf8Path, Utf8PathBuf};

pub const PROJECT_FILE_NAME: &str = "foundrydata.toml";

/// Search `start` and each of its ancestors for `foundrydata.toml`,
/// returning the first match. Does not follow symlinks specially; relies
/// on `Utf8Path::exists` which resolves them.
#[must_use]
pub fn discover_project_file(start: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(PROJECT_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn finds_project_file_in_starting_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        std::fs::write(root.join(PROJECT_FILE_NAME), "[defaults]\ncount = 5\n").unwrap();
        assert_eq!(discover_project_file(&root), Some(root.join(PROJECT_FILE_NAME)));
    }

    #[test]
    fn finds_project_file_in_ancestor_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        std::fs::write(root.join(PROJECT_FILE_NAME), "[defaults]\ncount = 5\n").unwrap();
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(discover_project_file(&nested), Some(root.join(PROJECT_FILE_NAME)));
    }

    #[test]
    fn returns_none_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        assert_eq!(discover_project_file(&root), None);
    }
}
