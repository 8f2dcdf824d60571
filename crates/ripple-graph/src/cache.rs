//! Run-scoped graph cache.
//!
//! A file referenced by several hunks or several resolution steps is parsed
//! and annotated once per run. The cache is created by the run, passed
//! explicitly through calls, and dropped with it; nothing persists across
//! runs and no module-level state is involved, so independent runs can never
//! observe each other.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::parse::parse_source;
use crate::report::{Diagnostic, DiagnosticKind};
use crate::scope::{self, FileGraph};
use crate::source::{SourceError, TextSource};

/// Cached outcome per path: a graph, or `None` when the file failed to parse
/// (recorded once as a diagnostic, not retried).
#[derive(Default)]
pub struct GraphCache {
    entries: FxHashMap<String, Option<Arc<FileGraph>>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build (or fetch) the scope graph for `path`.
    ///
    /// `Ok(None)` means the source is malformed: the file is excluded from
    /// the graph and a `ParseFailure` diagnostic has been recorded. Read
    /// failures surface as `Err` for the caller to triage: fatal for
    /// required files, diagnostic-and-skip for best-effort lookups.
    pub fn get_or_build(
        &mut self,
        path: &str,
        source: &dyn TextSource,
    ) -> Result<Option<Arc<FileGraph>>, SourceError> {
        if let Some(entry) = self.entries.get(path) {
            return Ok(entry.clone());
        }
        let text = source.read(path)?;
        let entry = match parse_source(&text, path) {
            Ok(arena) => Some(Arc::new(scope::build(arena, path))),
            Err(err) => {
                tracing::warn!(file = path, error = %err, "excluding file from graph");
                self.diagnostics
                    .push(Diagnostic::new(DiagnosticKind::ParseFailure, path, err.message));
                None
            }
        };
        self.entries.insert(path.to_string(), entry.clone());
        Ok(entry)
    }

    /// Fetch without building; used by stages that must not trigger I/O.
    pub fn get(&self, path: &str) -> Option<Arc<FileGraph>> {
        self.entries.get(path).cloned().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryTextSource;

    #[test]
    fn second_lookup_hits_cache() {
        let source: MemoryTextSource =
            [("src/a.ts", "export const a = 1;")].into_iter().collect();
        let mut cache = GraphCache::new();
        let first = cache
            .get_or_build("src/a.ts", &source)
            .expect("read")
            .expect("graph");
        let second = cache
            .get_or_build("src/a.ts", &source)
            .expect("read")
            .expect("graph");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn parse_failure_becomes_diagnostic() {
        let source: MemoryTextSource = [("src/bad.ts", "const x = {{{{")].into_iter().collect();
        let mut cache = GraphCache::new();
        let entry = cache.get_or_build("src/bad.ts", &source).expect("read");
        assert!(entry.is_none());
        assert_eq!(cache.diagnostics.len(), 1);
        assert_eq!(cache.diagnostics[0].kind, DiagnosticKind::ParseFailure);
        // Second lookup does not duplicate the diagnostic.
        let again = cache.get_or_build("src/bad.ts", &source).expect("read");
        assert!(again.is_none());
        assert_eq!(cache.diagnostics.len(), 1);
    }
}
