//! Run orchestration: hunks in, impact report out.
//!
//! One `ImpactAnalysis` run wires the pipeline together: per-file scope
//! graphs for both snapshot sides (old/new), cross-file resolution over the
//! changed files plus their reverse-dependency closure, diff mapping and
//! reconciliation per changed file, and bounded transitive propagation. The
//! two graph caches live exactly as long as the run.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use ripple_config::{validate_schema, RippleConfig};

use crate::cache::GraphCache;
use crate::diff::{map_hunk, reconcile, ClassifiedChange, DiffHunk};
use crate::error::Result;
use crate::impact::{affected_exports_in_range, resolve_transitive, ImpactOptions};
use crate::module_graph::{collect_upstream_files, ModuleGraphProvider};
use crate::parse::SourceKind;
use crate::report::{FileChangeKind, FileImpact, ImpactReport};
use crate::resolve::{member_key, resolve_project};
use crate::scope::FileGraph;
use crate::source::{SourceError, TextSource};

/// Reverse-dependency hops gathered before cross-file resolution. Matches
/// the transitive hop ceiling's order of magnitude; files further away can
/// never appear in a bounded result anyway.
const UPSTREAM_SWEEP_HOPS: u32 = 9;

/// Everything a run is parameterized on. Both snapshot sides are injected
/// text sources; nothing here touches the filesystem directly.
pub struct ImpactAnalysis<'a> {
    pub old_source: &'a dyn TextSource,
    pub new_source: &'a dyn TextSource,
    pub module_graph: &'a dyn ModuleGraphProvider,
    pub config: &'a RippleConfig,
}

/// Per-changed-file mapping output, exposed for callers that want the
/// classified changes alongside the impact report.
#[derive(Debug)]
pub struct FileChangeSet {
    pub file: String,
    pub change_kind: FileChangeKind,
    pub changes: Vec<ClassifiedChange>,
    pub affected_exports: Vec<String>,
}

/// A run's full output.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub report: ImpactReport,
    pub change_sets: Vec<FileChangeSet>,
}

impl ImpactAnalysis<'_> {
    /// Run the full pipeline over already-parsed hunks.
    ///
    /// `project_files` is the set of project-relative paths that exist in
    /// the new snapshot; it anchors specifier resolution. Data-quality
    /// problems degrade into diagnostics; only unreadable required files
    /// (or an invalid config) abort.
    pub fn analyze(
        &self,
        hunks: &[DiffHunk],
        project_files: &FxHashSet<String>,
    ) -> Result<AnalysisOutcome> {
        validate_schema(self.config)?;

        let mut old_cache = GraphCache::new();
        let mut new_cache = GraphCache::new();
        let options = ImpactOptions {
            max_hops: self.config.max_hops,
        };

        // Group hunks per file, preserving diff order.
        let mut per_file: IndexMap<String, Vec<&DiffHunk>> = IndexMap::new();
        for hunk in hunks {
            per_file.entry(hunk.file_path.clone()).or_default().push(hunk);
        }
        let changed_files: Vec<String> = per_file.keys().cloned().collect();

        // Build new-side graphs for the changed files plus everything that
        // transitively imports them; cross-file resolution reads this pool.
        let involved =
            collect_upstream_files(self.module_graph, &changed_files, UPSTREAM_SWEEP_HOPS);
        let mut pool: Vec<Arc<FileGraph>> = Vec::new();
        for file in &involved {
            if self.config.is_ignored_path(file) || !SourceKind::from_path(file).is_analyzable() {
                continue;
            }
            match new_cache.get_or_build(file, self.new_source) {
                Ok(Some(graph)) => pool.push(graph),
                Ok(None) => {}
                Err(SourceError::NotFound(_)) => {
                    // Deleted files and stale module-graph entries have no
                    // new-side source; the old side may still cover them.
                }
                Err(err) => return Err(err.into()),
            }
        }
        let resolved = resolve_project(pool.iter().map(Arc::as_ref), self.config, project_files);

        let mut report = ImpactReport::default();
        let mut change_sets = Vec::new();

        for (file, file_hunks) in &per_file {
            let change_kind = file_hunks
                .first()
                .map(|h| h.change_kind)
                .unwrap_or(FileChangeKind::Modified);
            let analyzable = !self.config.is_ignored_path(file)
                && SourceKind::from_path(file).is_analyzable();
            if !analyzable {
                continue;
            }

            let new_graph = match change_kind {
                FileChangeKind::Deleted => None,
                _ => self.required_graph(&mut new_cache, self.new_source, file)?,
            };
            let old_graph = match change_kind {
                FileChangeKind::Added => None,
                _ => self.required_graph(&mut old_cache, self.old_source, file)?,
            };

            let mut changes = Vec::new();
            for &hunk in file_hunks {
                changes.extend(map_hunk(hunk, old_graph.as_deref(), new_graph.as_deref()));
            }
            let changes = reconcile(changes);

            let affected_exports = match change_kind {
                FileChangeKind::Added => new_graph
                    .as_deref()
                    .map(all_export_names)
                    .unwrap_or_default(),
                _ => {
                    let mut names = Vec::new();
                    for &hunk in file_hunks {
                        if let (Some(graph), Some((start, end))) =
                            (new_graph.as_deref(), hunk.added_range())
                        {
                            names.extend(affected_exports_in_range(graph, start, end));
                        }
                        if let (Some(graph), Some((start, end))) =
                            (old_graph.as_deref(), hunk.removed_range())
                        {
                            names.extend(affected_exports_in_range(graph, start, end));
                        }
                    }
                    names.sort();
                    names.dedup();
                    names
                }
            };

            let export_keys: FxHashSet<String> = affected_exports
                .iter()
                .map(|name| member_key(file, name))
                .collect();
            let frontier = resolved.importers_of(&export_keys);
            let transitive =
                resolve_transitive(frontier, &resolved, &mut new_cache, self.new_source, &options)?;

            report.truncated |= transitive.truncated;
            report.diagnostics.extend(transitive.diagnostics);
            if let Some(graph) = new_graph.as_deref() {
                report.diagnostics.extend(graph.diagnostics.iter().cloned());
            }
            report.files.push(FileImpact {
                file: file.clone(),
                change_kind,
                affected_exports: affected_exports.clone(),
                importers: transitive.importers,
                downstream_exports: transitive.impacted,
            });
            change_sets.push(FileChangeSet {
                file: file.clone(),
                change_kind,
                changes,
                affected_exports,
            });
        }

        report.diagnostics.extend(resolved.diagnostics);
        report.diagnostics.extend(old_cache.diagnostics);
        report.diagnostics.extend(new_cache.diagnostics);
        Ok(AnalysisOutcome {
            report,
            change_sets,
        })
    }

    /// A changed file's graph on the side where it must exist: read errors
    /// abort, parse failures degrade (already recorded by the cache).
    fn required_graph(
        &self,
        cache: &mut GraphCache,
        source: &dyn TextSource,
        file: &str,
    ) -> Result<Option<Arc<FileGraph>>> {
        Ok(cache.get_or_build(file, source)?)
    }
}

fn all_export_names(graph: &FileGraph) -> Vec<String> {
    let mut names: Vec<String> = graph
        .exports
        .iter()
        .flat_map(|record| record.members.iter().map(|m| m.exported.clone()))
        .collect();
    names.sort();
    names.dedup();
    names
}
