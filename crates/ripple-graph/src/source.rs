//! Injected text-source boundary.
//!
//! The engine never hard-wires file paths: callers hand it something that can
//! produce source text for a project-relative path. The filesystem
//! implementation covers real runs; the in-memory one backs tests and
//! embedders that already hold the two file trees being compared.

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors from reading a source file. Unreadable *required* files abort a
/// run; everything else degrades to a diagnostic at the call site.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },
}

/// Something that yields source text for project-relative paths.
pub trait TextSource {
    fn read(&self, path: &str) -> Result<String, SourceError>;
}

/// Reads files below a root directory.
#[derive(Debug, Clone)]
pub struct FsTextSource {
    root: PathBuf,
}

impl FsTextSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextSource for FsTextSource {
    fn read(&self, path: &str) -> Result<String, SourceError> {
        let full = self.root.join(path);
        if !full.exists() {
            return Err(SourceError::NotFound(path.to_string()));
        }
        std::fs::read_to_string(&full).map_err(|e| SourceError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// In-memory file tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryTextSource {
    files: FxHashMap<String, String>,
}

impl MemoryTextSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl<P: Into<String>, T: Into<String>> FromIterator<(P, T)> for MemoryTextSource {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (path, text) in iter {
            source.insert(path, text);
        }
        source
    }
}

impl TextSource for MemoryTextSource {
    fn read(&self, path: &str) -> Result<String, SourceError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_round_trip() {
        let source: MemoryTextSource =
            [("src/a.ts", "export const a = 1;")].into_iter().collect();
        assert_eq!(source.read("src/a.ts").expect("read"), "export const a = 1;");
        assert!(matches!(
            source.read("src/missing.ts"),
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn fs_source_reads_below_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("x.ts"), "const x = 1;").expect("write");
        let source = FsTextSource::new(dir.path());
        assert_eq!(source.read("x.ts").expect("read"), "const x = 1;");
        assert!(matches!(
            source.read("y.ts"),
            Err(SourceError::NotFound(_))
        ));
    }
}
