//! Record file discovery.
//!
//! `RecordFiles` describes *which* files to read, not their contents.
//! Every call to [`RecordFiles::iter`] starts a fresh directory walk, so the
//! sequence can be consumed once per pipeline stage.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Error, Result};

/// Default suffix of raw record files.
pub const DEFAULT_SUFFIX: &str = ".txt";

/// Lazy, restartable sequence of record file paths under a root directory.
#[derive(Debug, Clone)]
pub struct RecordFiles {
    root: PathBuf,
    suffix: String,
}

impl RecordFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), suffix: DEFAULT_SUFFIX.to_string() }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree, following symlinks, in file-name order within each
    /// directory. Yields only regular files whose name ends in the suffix.
    pub fn iter(&self) -> impl Iterator<Item = Result<PathBuf>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    let matches = entry.file_type().is_file()
                        && entry.file_name().to_string_lossy().ends_with(self.suffix.as_str());
                    matches.then(|| Ok(entry.into_path()))
                }
                Err(e) => Some(Err(Error::from(e))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_recursive_suffix_filter() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a/a.txt"), "").unwrap();
        fs::write(dir.path().join("a/b/c.txt"), "").unwrap();
        fs::write(dir.path().join("a/notes.md"), "").unwrap();

        let files = RecordFiles::new(dir.path());
        let found: Vec<_> = files.iter().collect::<Result<Vec<_>>>().unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a/a.txt", "a/b/c.txt", "b.txt"]);
    }

    #[test]
    fn test_restartable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.txt"), "").unwrap();
        let files = RecordFiles::new(dir.path());
        assert_eq!(files.iter().count(), 1);
        assert_eq!(files.iter().count(), 1);
    }

    #[test]
    fn test_custom_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.txt"), "").unwrap();
        fs::write(dir.path().join("y.wos"), "").unwrap();
        let files = RecordFiles::new(dir.path()).with_suffix(".wos");
        let found: Vec<_> = files.iter().map(|p| p.unwrap()).collect();
        assert_eq!(found, vec![dir.path().join("y.wos")]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let files = RecordFiles::new("/definitely/not/here");
        assert!(files.iter().next().unwrap().is_err());
    }
}
