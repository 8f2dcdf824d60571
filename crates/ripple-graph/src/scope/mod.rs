//! Per-file scope graph.
//!
//! [`build`] annotates one file's arena with bindings, references, scope
//! tables, effect sets, occupation back-edges, and the file's import/export
//! tables. The result is self-contained: cross-file stages only ever read
//! `FileGraph`s, they never reach back into the parser.

mod builder;
mod effects;
mod tables;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::{AstArena, Field, NodeId, NodeKind};
use crate::globals;
use crate::report::Diagnostic;

pub use builder::build;

/// What a binding introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    Import,
    Variable,
    Function,
    Class,
    Param,
    Enum,
    Interface,
    TypeAlias,
}

/// Per-node derived facts. Every node has exactly one record.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    /// Set when the node introduces a name into a scope.
    pub binding: Option<BindingKind>,
    /// Set when the node reads a name.
    pub is_reference: bool,
    /// Candidate bindings found walking scopes outward; first is chosen.
    /// Empty only for true free references.
    pub resolved_scope: Vec<NodeId>,
    /// Reverse edges: every reference that resolved to this binding.
    pub occupation: Vec<NodeId>,
    /// References whose change may alter this node's value.
    pub effects: Vec<NodeId>,
}

impl Annotation {
    fn add_effect(&mut self, id: NodeId) {
        if !self.effects.contains(&id) {
            self.effects.push(id);
        }
    }
}

/// Name table owned by one scope node.
#[derive(Debug, Default)]
pub struct ScopeTable {
    names: IndexMap<String, Vec<NodeId>>,
}

impl ScopeTable {
    fn add(&mut self, name: &str, id: NodeId) {
        self.names.entry(name.to_string()).or_default().push(id);
    }

    pub fn get(&self, name: &str) -> &[NodeId] {
        self.names.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

/// One `import … from 'source'` statement, flattened to member pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub source: String,
    /// Empty for side-effect imports (`import './x'`).
    pub members: Vec<ImportMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportMember {
    pub local: String,
    /// The name on the exporting side: a member name, `default`, or `*`.
    pub imported: String,
}

/// Export statements grouped by upstream source (`None` for own exports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub source: Option<String>,
    pub members: Vec<ExportMember>,
    /// True for `export * from 'source'`.
    pub export_all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMember {
    pub local: String,
    pub exported: String,
}

/// One file's annotated tree plus its lookup indexes.
#[derive(Debug)]
pub struct FileGraph {
    pub file_path: String,
    pub arena: AstArena,
    annotations: Vec<Annotation>,
    scopes: FxHashMap<NodeId, ScopeTable>,
    line_index: FxHashMap<u32, Vec<NodeId>>,
    path_index: FxHashMap<String, Vec<NodeId>>,
    pub imports: Vec<ImportRecord>,
    pub exports: Vec<ExportRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileGraph {
    pub fn program(&self) -> Option<NodeId> {
        self.arena.root()
    }

    pub fn annotation(&self, id: NodeId) -> &Annotation {
        &self.annotations[id.index()]
    }

    /// The binding a reference resolved to, when any.
    pub fn chosen_binding(&self, id: NodeId) -> Option<NodeId> {
        self.annotation(id).resolved_scope.first().copied()
    }

    pub fn nodes_at_line(&self, line: u32) -> &[NodeId] {
        self.line_index.get(&line).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nodes_by_path(&self, path: &str) -> &[NodeId] {
        self.path_index.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Program-scope bindings registered under `name`.
    pub fn program_bindings(&self, name: &str) -> &[NodeId] {
        let Some(root) = self.arena.root() else {
            return &[];
        };
        self.scopes
            .get(&root)
            .map(|table| table.get(name))
            .unwrap_or(&[])
    }

    pub fn program_scope(&self) -> Option<&ScopeTable> {
        self.arena.root().and_then(|root| self.scopes.get(&root))
    }

    /// Nodes whose span lies fully within `[start, end]`, excluding the file
    /// root, keeping only nodes with no kept ancestor (outermost wins).
    pub fn top_scope_nodes_in_range(&self, start: u32, end: u32) -> Vec<NodeId> {
        let root = match self.arena.root() {
            Some(root) => root,
            None => return Vec::new(),
        };
        let mut candidates: Vec<NodeId> = Vec::new();
        for line in start..=end {
            for &id in self.nodes_at_line(line) {
                if id == root {
                    continue;
                }
                if self.arena.node(id).span.within_lines(start, end) && !candidates.contains(&id) {
                    candidates.push(id);
                }
            }
        }
        candidates.sort_unstable();
        let mut kept: Vec<NodeId> = Vec::new();
        let mut kept_end = 0u32;
        for id in candidates {
            if !kept.is_empty() && id.0 < kept_end {
                continue;
            }
            kept_end = self.arena.node(id).end.0;
            kept.push(id);
        }
        kept
    }

    /// True when an unresolved reference is explained by the global
    /// allow-list (window properties, JSX intrinsics, standard attributes).
    pub fn is_allowlisted(&self, id: NodeId) -> bool {
        allowlisted(&self.arena, id)
    }

    /// References with no binding in any enclosing scope, net of the
    /// allow-list. These are the file's "untracked" identifiers.
    pub fn untracked_references(&self) -> Vec<NodeId> {
        self.arena
            .ids()
            .filter(|&id| {
                let ann = self.annotation(id);
                ann.is_reference && ann.resolved_scope.is_empty() && !self.is_allowlisted(id)
            })
            .collect()
    }

    /// Compact location string for diagnostics.
    pub fn short_msg(&self, id: NodeId) -> String {
        let node = self.arena.node(id);
        let label = node.name.as_deref().unwrap_or_else(|| node.kind.name());
        format!(
            "{} ({}:{}-{}:{})",
            label,
            node.span.start_line,
            node.span.start_column,
            node.span.end_line,
            node.span.end_column
        )
    }

    pub(crate) fn annotation_mut(&mut self, id: NodeId) -> &mut Annotation {
        &mut self.annotations[id.index()]
    }
}

/// Allow-list check shared between build-time diagnostics and the public
/// untracked query.
pub(crate) fn allowlisted(arena: &AstArena, id: NodeId) -> bool {
    let node = arena.node(id);
    let Some(name) = node.name.as_deref() else {
        return false;
    };
    match node.kind {
        NodeKind::Identifier => globals::is_window_property(name),
        NodeKind::JsxIdentifier => {
            let parent_kind = node.parent.map(|p| arena.node(p).kind);
            match parent_kind {
                Some(NodeKind::JsxOpeningElement) | Some(NodeKind::JsxClosingElement) => {
                    globals::is_intrinsic_element(name)
                }
                Some(NodeKind::JsxAttribute) => globals::is_standard_attribute(name),
                _ => false,
            }
        }
        _ => false,
    }
}

/// Leaf identifiers of a binding pattern: the declared names of a destructured
/// declarator, parameter, or catch param. Defaults and computed keys are
/// expression positions and are not descended into.
pub fn pattern_identifiers(arena: &AstArena, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect_pattern_identifiers(arena, root, &mut out);
    out
}

fn collect_pattern_identifiers(arena: &AstArena, id: NodeId, out: &mut Vec<NodeId>) {
    let node = arena.node(id);
    match node.kind {
        NodeKind::Identifier => out.push(id),
        NodeKind::ObjectPattern => {
            for prop in arena.children_by_field(id, Field::Properties) {
                match arena.node(prop).kind {
                    NodeKind::Property { .. } => {
                        if let Some(value) = arena.child_by_field(prop, Field::Value) {
                            collect_pattern_identifiers(arena, value, out);
                        }
                    }
                    // Shorthand identifier directly in an assignment pattern.
                    NodeKind::Identifier => out.push(prop),
                    _ => {}
                }
            }
            if let Some(rest) = arena.child_by_field(id, Field::Rest) {
                collect_pattern_identifiers(arena, rest, out);
            }
        }
        NodeKind::ArrayPattern => {
            for element in arena.children_by_field(id, Field::Elements) {
                collect_pattern_identifiers(arena, element, out);
            }
            if let Some(rest) = arena.child_by_field(id, Field::Rest) {
                collect_pattern_identifiers(arena, rest, out);
            }
        }
        NodeKind::RestElement => {
            if let Some(argument) = arena.child_by_field(id, Field::Argument) {
                collect_pattern_identifiers(arena, argument, out);
            }
        }
        NodeKind::AssignmentPattern => {
            if let Some(left) = arena.child_by_field(id, Field::Left) {
                collect_pattern_identifiers(arena, left, out);
            }
        }
        _ => {}
    }
}

/// Reference identifiers within a subtree, root included.
pub(crate) fn reference_identifiers(graph: &FileGraph, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    if graph.annotation(root).is_reference {
        out.push(root);
    }
    for id in graph.arena.descendants(root) {
        if graph.annotation(id).is_reference {
            out.push(id);
        }
    }
    out
}
