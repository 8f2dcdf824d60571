//! Integration-style tests over the full per-file and cross-file pipeline.
//!
//! These are fast, deterministic tests; property-based coverage lives in
//! property_tests.rs.

mod diff_tests;
mod impact_tests;
mod property_tests;
mod resolve_tests;
mod scope_tests;

use crate::scope::FileGraph;

/// Parse and annotate one in-memory file.
pub(crate) fn graph_of(path: &str, source: &str) -> FileGraph {
    let arena = crate::parse::parse_source(source, path).expect("parse");
    crate::scope::build(arena, path)
}
