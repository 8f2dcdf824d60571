//! Bounded transitive impact resolution.
//!
//! Given a frontier of `(file, localImportName)` pairs, repeatedly: group by
//! file, find which of that file's exported members causally depend on the
//! frontier locals (occupation links restricted to module-top-level
//! statements), then fan out to every importer of those members to form the
//! next frontier. A visited-edge set keeps mutual re-exports from looping; a
//! hop ceiling bounds the walk and marks the result `truncated` instead of
//! running forever. The result is a documented lower bound.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::arena::{Field, NodeId, NodeKind};
use crate::cache::GraphCache;
use crate::report::{
    ContributingImport, Diagnostic, DiagnosticKind, ImpactedExport, ImporterImpact,
};
use crate::resolve::{member_key, split_member_key, ResolvedProject};
use crate::scope::{pattern_identifiers, FileGraph};
use crate::source::{SourceError, TextSource};

/// Tunables for the resolver. The hop ceiling is pragmatic, not derived from
/// project size; keep it adjustable and surface `truncated` instead of
/// hiding the limit.
#[derive(Debug, Clone, Copy)]
pub struct ImpactOptions {
    pub max_hops: u32,
}

impl Default for ImpactOptions {
    fn default() -> Self {
        Self {
            max_hops: ripple_config::DEFAULT_MAX_HOPS,
        }
    }
}

/// Output of one transitive resolution.
#[derive(Debug, Default)]
pub struct TransitiveImpact {
    /// `(file, exportedName)` pairs the impact reached, with causal chains.
    pub impacted: Vec<ImpactedExport>,
    /// Every `(file, localName)` importer visited, direct and transitive.
    pub importers: Vec<ImporterImpact>,
    pub truncated: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Statements of interest start as the seed set and grow through
/// declared-name occupation links until nothing new appears.
fn statement_closure(graph: &FileGraph, seeds: FxHashSet<NodeId>) -> FxHashSet<NodeId> {
    let mut statements = seeds;
    let mut processed: FxHashSet<NodeId> = FxHashSet::default();
    loop {
        let new_ids: Vec<NodeId> = statements
            .iter()
            .flat_map(|&stmt| declared_identifiers(graph, stmt))
            .filter(|&id| processed.insert(id))
            .collect();
        let mut grew = false;
        for id in new_ids {
            for &reference in &graph.annotation(id).occupation {
                if let Some(top) = graph.arena.top_level_statement(reference) {
                    grew |= statements.insert(top);
                }
            }
        }
        if !grew {
            return statements;
        }
    }
}

/// Unwrap `export …` wrappers to the inner declaration.
fn unwrap_export(graph: &FileGraph, stmt: NodeId) -> NodeId {
    match graph.arena.node(stmt).kind {
        NodeKind::ExportNamedDeclaration | NodeKind::ExportDefaultDeclaration => graph
            .arena
            .child_by_field(stmt, Field::Declaration)
            .unwrap_or(stmt),
        _ => stmt,
    }
}

/// Names a top-level statement declares (import locals included).
fn declared_identifiers(graph: &FileGraph, stmt: NodeId) -> Vec<NodeId> {
    let target = unwrap_export(graph, stmt);
    let arena = &graph.arena;
    match arena.node(target).kind {
        NodeKind::VariableDeclaration => arena
            .children_by_field(target, Field::Declarations)
            .filter_map(|declarator| arena.child_by_field(declarator, Field::Id))
            .flat_map(|pattern| pattern_identifiers(arena, pattern))
            .collect(),
        NodeKind::FunctionDeclaration
        | NodeKind::ClassDeclaration
        | NodeKind::TsEnumDeclaration
        | NodeKind::TsInterfaceDeclaration
        | NodeKind::TsTypeAliasDeclaration => {
            arena.child_by_field(target, Field::Id).into_iter().collect()
        }
        NodeKind::ImportDeclaration => arena
            .children_by_field(target, Field::Specifiers)
            .filter_map(|spec| arena.child_by_field(spec, Field::Local))
            .collect(),
        _ => Vec::new(),
    }
}

/// Exported member names a top-level statement exposes.
fn export_names_of(graph: &FileGraph, stmt: NodeId) -> Vec<String> {
    let arena = &graph.arena;
    let mut names = Vec::new();
    match arena.node(stmt).kind {
        NodeKind::ExportDefaultDeclaration => names.push("default".to_string()),
        NodeKind::ExportNamedDeclaration => {
            for spec in arena.children_by_field(stmt, Field::Specifiers) {
                if let Some(exported) = arena
                    .child_by_field(spec, Field::Exported)
                    .and_then(|e| arena.node(e).name.clone())
                {
                    names.push(exported);
                }
            }
            if let Some(declaration) = arena.child_by_field(stmt, Field::Declaration) {
                match arena.node(declaration).kind {
                    NodeKind::VariableDeclaration => {
                        for declarator in arena.children_by_field(declaration, Field::Declarations)
                        {
                            if let Some(pattern) = arena.child_by_field(declarator, Field::Id) {
                                for id in pattern_identifiers(arena, pattern) {
                                    if let Some(name) = arena.node(id).name.clone() {
                                        names.push(name);
                                    }
                                }
                            }
                        }
                    }
                    NodeKind::FunctionDeclaration
                    | NodeKind::ClassDeclaration
                    | NodeKind::TsEnumDeclaration
                    | NodeKind::TsInterfaceDeclaration
                    | NodeKind::TsTypeAliasDeclaration => {
                        if let Some(name) = arena
                            .child_by_field(declaration, Field::Id)
                            .and_then(|id| arena.node(id).name.clone())
                        {
                            names.push(name);
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
    names
}

fn sorted_dedup(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names.dedup();
    names
}

/// Exported members whose definitions or occupation-linked top-level
/// statements intersect the changed line range. A `.vue` file with nothing
/// resolvable falls back to its `default` export.
pub fn affected_exports_in_range(graph: &FileGraph, start: u32, end: u32) -> Vec<String> {
    let mut seeds: FxHashSet<NodeId> = FxHashSet::default();
    for line in start..=end {
        for &node in graph.nodes_at_line(line) {
            if let Some(top) = graph.arena.top_level_statement(node) {
                seeds.insert(top);
            }
        }
    }
    let statements = statement_closure(graph, seeds);
    let mut names: Vec<String> = statements
        .iter()
        .flat_map(|&stmt| export_names_of(graph, stmt))
        .collect();
    if names.is_empty() && graph.file_path.ends_with(".vue") {
        names.push("default".to_string());
    }
    sorted_dedup(names)
}

/// Exported members that causally depend on the given program-scope local
/// names (typically import locals of one frontier file).
pub fn exports_reached_from_locals(graph: &FileGraph, locals: &[String]) -> Vec<String> {
    let mut seeds: FxHashSet<NodeId> = FxHashSet::default();
    for local in locals {
        for &binding in graph.program_bindings(local) {
            for &reference in &graph.annotation(binding).occupation {
                if let Some(top) = graph.arena.top_level_statement(reference) {
                    seeds.insert(top);
                }
            }
        }
    }
    let statements = statement_closure(graph, seeds);
    sorted_dedup(
        statements
            .iter()
            .flat_map(|&stmt| export_names_of(graph, stmt))
            .collect(),
    )
}

fn contributing_import(resolved: &ResolvedProject, file: &str, local: &str) -> ContributingImport {
    let from_file = resolved
        .import_to_export
        .get(&member_key(file, local))
        .map(|target| split_member_key(target).0.to_string())
        .unwrap_or_default();
    ContributingImport {
        from_file,
        local_name: local.to_string(),
    }
}

/// Propagate impact from a frontier of `(file, localImportName)` pairs.
///
/// Every frontier pair, initial ones included, is recorded as an importer
/// impact. Read failures bubble up; the caller decides whether the file was
/// required.
pub fn resolve_transitive(
    frontier: Vec<(String, String)>,
    resolved: &ResolvedProject,
    cache: &mut GraphCache,
    source: &dyn TextSource,
    options: &ImpactOptions,
) -> Result<TransitiveImpact, SourceError> {
    let mut impact = TransitiveImpact::default();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut frontier = frontier;
    frontier.sort();
    frontier.dedup();
    for (file, local) in &frontier {
        visited.insert(member_key(file, local));
        impact.importers.push(ImporterImpact {
            file: file.clone(),
            local_name: local.clone(),
            contributing_imports: vec![contributing_import(resolved, file, local)],
        });
    }

    let mut hops = 0u32;
    while !frontier.is_empty() {
        if hops >= options.max_hops {
            impact.truncated = true;
            impact.diagnostics.push(Diagnostic::new(
                DiagnosticKind::ResolutionTruncated,
                "",
                format!(
                    "hop ceiling {} reached with {} pending imports; result is a lower bound",
                    options.max_hops,
                    frontier.len()
                ),
            ));
            tracing::warn!(pending = frontier.len(), "transitive resolution truncated");
            break;
        }
        hops += 1;

        let mut by_file: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for (file, local) in frontier.drain(..) {
            by_file.entry(file).or_default().push(local);
        }
        let mut by_file: Vec<(String, Vec<String>)> = by_file.into_iter().collect();
        by_file.sort();

        let mut export_keys: FxHashSet<String> = FxHashSet::default();
        for (file, locals) in by_file {
            let graph = match cache.get_or_build(&file, source) {
                Ok(Some(graph)) => graph,
                // Parse failure was recorded once by the cache; the walk
                // simply cannot see through this file.
                Ok(None) => continue,
                Err(SourceError::NotFound(path)) => {
                    impact.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::ParseFailure,
                        file.as_str(),
                        format!("unreadable during propagation: {path}"),
                    ));
                    continue;
                }
                Err(err) => return Err(err),
            };
            let contributing: Vec<ContributingImport> = locals
                .iter()
                .map(|local| contributing_import(resolved, &file, local))
                .collect();
            for export_name in exports_reached_from_locals(&graph, &locals) {
                export_keys.insert(member_key(&file, &export_name));
                impact.impacted.push(ImpactedExport {
                    file: file.clone(),
                    export_name,
                    contributing_imports: contributing.clone(),
                });
            }
        }

        for (file, local) in resolved.importers_of(&export_keys) {
            let key = member_key(&file, &local);
            if visited.insert(key) {
                impact.importers.push(ImporterImpact {
                    file: file.clone(),
                    local_name: local.clone(),
                    contributing_imports: vec![contributing_import(resolved, &file, &local)],
                });
                frontier.push((file, local));
            }
        }
    }

    impact
        .impacted
        .sort_by(|a, b| (&a.file, &a.export_name).cmp(&(&b.file, &b.export_name)));
    impact
        .importers
        .sort_by(|a, b| (&a.file, &a.local_name).cmp(&(&b.file, &b.local_name)));
    Ok(impact)
}
