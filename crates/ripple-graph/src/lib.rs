//! # ripple-graph
//!
//! Change-impact analysis for JavaScript/TypeScript/Vue projects: given the
//! diff hunks between two snapshots of a codebase, determine which exported
//! symbols of the changed files are affected, and transitively which
//! importing files and symbols downstream are affected.
//!
//! ## Architecture
//!
//! ```text
//! parse (oxc)  ──►  scope (per-file graphs)
//!                        │
//!          ┌─────────────┴─────────────┐
//!          ▼                           ▼
//!      resolve (cross-file maps)   diff (hunk → classified changes)
//!          └─────────────┬─────────────┘
//!                        ▼
//!              impact (bounded fixed point)
//!                        ▼
//!              report (ImpactReport + diagnostics)
//! ```
//!
//! - **Per-file stage**: every analyzed file is lowered into an index-based
//!   arena ([`arena`]) and annotated with bindings, references, scopes,
//!   effect sets, and import/export tables ([`scope`]). File builds are
//!   independent of each other.
//! - **Cross-file stage**: [`resolve`] combines the per-file tables with the
//!   alias config into `file#member` maps; [`impact`] propagates a change
//!   frontier across them, bounded by a hop ceiling.
//! - **Diff stage**: [`diff`] maps hunk line ranges onto the old and new
//!   graphs and classifies the outermost changed statements.
//!
//! Everything is synchronous and single-threaded per run; the only shared
//! resource is a run-scoped [`cache::GraphCache`] passed explicitly.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ripple_graph::{ImpactAnalysis, MemoryModuleGraph, MemoryTextSource};
//! use ripple_config::RippleConfig;
//! use rustc_hash::FxHashSet;
//!
//! # fn main() -> Result<(), ripple_graph::GraphError> {
//! let old: MemoryTextSource = [("src/util.ts", "export const a = 1;")].into_iter().collect();
//! let new: MemoryTextSource = [("src/util.ts", "export const a = 2;")].into_iter().collect();
//! let module_graph: MemoryModuleGraph = [("src/util.ts", Vec::<&str>::new())].into_iter().collect();
//! let config = RippleConfig::default();
//!
//! let analysis = ImpactAnalysis {
//!     old_source: &old,
//!     new_source: &new,
//!     module_graph: &module_graph,
//!     config: &config,
//! };
//! let project_files: FxHashSet<String> = ["src/util.ts".to_string()].into_iter().collect();
//! let outcome = analysis.analyze(&[/* hunks */], &project_files)?;
//! println!("{} impacted files", outcome.report.files.len());
//! # Ok(())
//! # }
//! ```
//!
//! Error handling follows one rule throughout: data-quality problems
//! (malformed source, unresolved names, dangling export members, truncated
//! resolution) degrade locally into [`report::Diagnostic`] entries; only
//! infrastructure failures abort a run.

pub mod analysis;
pub mod arena;
pub mod cache;
pub mod diff;
mod error;
mod globals;
pub mod impact;
pub mod module_graph;
pub mod parse;
pub mod report;
pub mod resolve;
pub mod scope;
pub mod source;
pub mod span;

pub use analysis::{AnalysisOutcome, FileChangeSet, ImpactAnalysis};
pub use arena::{AstArena, Field, Node, NodeId, NodeKind};
pub use cache::GraphCache;
pub use diff::{
    ChangeClass, ChangedIdent, ClassifiedChange, DiffHunk, DiffSide, EffectLink, IdentRole,
    map_hunk, reconcile,
};
pub use error::{GraphError, Result};
pub use impact::{
    affected_exports_in_range, exports_reached_from_locals, resolve_transitive, ImpactOptions,
    TransitiveImpact,
};
pub use module_graph::{collect_upstream_files, MemoryModuleGraph, ModuleGraphProvider};
pub use parse::{is_declaration_file, parse_source, ParseError, SourceKind};
pub use report::{
    ContributingImport, Diagnostic, DiagnosticKind, FileChangeKind, FileImpact, ImpactReport,
    ImpactedExport, ImporterImpact,
};
pub use resolve::{
    member_key, resolve_project, resolve_specifier, split_member_key, NoMatchExport,
    ResolvedProject, SpecifierResolution,
};
pub use scope::{
    build as build_scope_graph, pattern_identifiers, Annotation, BindingKind, ExportMember,
    ExportRecord, FileGraph, ImportMember, ImportRecord, ScopeTable,
};
pub use source::{FsTextSource, MemoryTextSource, SourceError, TextSource};
pub use span::SourceSpan;

// Re-export the consumed oxc surface for workspace consistency: downstream
// consumers use `ripple_graph::oxc::*` instead of importing oxc crates
// directly, so one oxc version crosses crate boundaries.
pub mod oxc {
    //! OXC (Oxidation Compiler) foundation types re-exported for workspace
    //! consistency.

    /// Arena allocator for AST nodes
    pub use oxc_allocator::Allocator;

    /// Span types for source location tracking
    pub use oxc_span::{GetSpan, SourceType, Span};

    /// AST node types
    pub use oxc_ast::ast;

    /// JavaScript/TypeScript parser
    pub use oxc_parser::{Parser, ParserReturn};
}

#[cfg(test)]
mod tests;
