//! Diff-to-AST mapping.
//!
//! Hunks arrive already parsed (raw unified-diff text is someone else's
//! job). Each hunk's added range is mapped against the new file's graph and
//! its removed range against the old file's graph: the outermost statements
//! whose spans sit inside the range are classified and their identifiers and
//! effect links extracted. After all hunks of a file are mapped,
//! [`reconcile`] cancels identifier paths present on both sides, code that
//! merely moved, not changed.

use serde::{Deserialize, Serialize};

use crate::arena::{Field, NodeId, NodeKind};
use crate::report::FileChangeKind;
use crate::scope::{reference_identifiers, FileGraph};

/// One contiguous unified-diff change region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    pub file_path: String,
    pub change_kind: FileChangeKind,
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    /// Hunk body lines with their `+`/`-`/` ` prefixes, when available.
    pub lines: Vec<String>,
}

impl DiffHunk {
    fn prefixed_count(&self, prefix: char, fallback: u32) -> u32 {
        if self.lines.is_empty() {
            fallback
        } else {
            self.lines
                .iter()
                .filter(|line| line.starts_with(prefix))
                .count() as u32
        }
    }

    /// Inclusive line range added by this hunk in the new file.
    pub fn added_range(&self) -> Option<(u32, u32)> {
        let count = self.prefixed_count('+', self.new_count);
        (count > 0).then(|| (self.new_start, self.new_start + count - 1))
    }

    /// Inclusive line range removed from the old file.
    pub fn removed_range(&self) -> Option<(u32, u32)> {
        let count = self.prefixed_count('-', self.old_count);
        (count > 0).then(|| (self.old_start, self.old_start + count - 1))
    }
}

/// Classification of one changed top-scope statement, first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeClass {
    Import,
    Declaration,
    SelfUpdate,
    Invoke,
    Assignment,
    /// Anything else, tagged with the concrete node kind.
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffSide {
    Added,
    Removed,
}

/// Where an identifier sat inside the classified statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentRole {
    /// The declared name itself.
    Id,
    /// Value dependency inside an initializer.
    Init,
    Left,
    Right,
    Callee,
    Argument,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedIdent {
    pub name: String,
    /// Structural path, the reconciliation key.
    pub path: String,
    pub role: IdentRole,
}

/// One identifier together with the paths of its effect set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectLink {
    pub cause_name: String,
    pub cause_path: String,
    pub effect_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedChange {
    pub class: ChangeClass,
    pub side: DiffSide,
    pub node_path: String,
    pub idents: Vec<ChangedIdent>,
    pub effects: Vec<EffectLink>,
}

/// Map one hunk onto the old and new graphs.
///
/// A hunk whose ranges cover zero statements (whitespace or comment-only
/// change) yields an empty, non-error result.
pub fn map_hunk(
    hunk: &DiffHunk,
    old_graph: Option<&FileGraph>,
    new_graph: Option<&FileGraph>,
) -> Vec<ClassifiedChange> {
    let mut changes = Vec::new();
    if let (Some(graph), Some((start, end))) = (new_graph, hunk.added_range()) {
        for node in graph.top_scope_nodes_in_range(start, end) {
            classify_into(graph, node, DiffSide::Added, &mut changes);
        }
    }
    if let (Some(graph), Some((start, end))) = (old_graph, hunk.removed_range()) {
        for node in graph.top_scope_nodes_in_range(start, end) {
            classify_into(graph, node, DiffSide::Removed, &mut changes);
        }
    }
    changes
}

fn classify_into(
    graph: &FileGraph,
    node: NodeId,
    side: DiffSide,
    out: &mut Vec<ClassifiedChange>,
) {
    // Expression statements unwrap to their inner expression.
    let mut node = node;
    while graph.arena.node(node).kind == NodeKind::ExpressionStatement {
        match graph.arena.child_by_field(node, Field::Expression) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    let class = classify(graph, node);
    out.push(extract(graph, node, class, side));
}

fn classify(graph: &FileGraph, node: NodeId) -> ChangeClass {
    let kind = graph.arena.node(node).kind;
    match kind {
        NodeKind::ImportDeclaration
        | NodeKind::ImportSpecifier
        | NodeKind::ImportDefaultSpecifier
        | NodeKind::ImportNamespaceSpecifier => ChangeClass::Import,
        NodeKind::VariableDeclaration | NodeKind::VariableDeclarator => ChangeClass::Declaration,
        _ if graph.arena.is_in_declarator_pattern(node) => ChangeClass::Declaration,
        NodeKind::FunctionDeclaration | NodeKind::ClassDeclaration => ChangeClass::Declaration,
        NodeKind::UnaryExpression { delete: true } | NodeKind::UpdateExpression => {
            ChangeClass::SelfUpdate
        }
        NodeKind::CallExpression => ChangeClass::Invoke,
        NodeKind::AssignmentExpression => ChangeClass::Assignment,
        _ => ChangeClass::Other(kind.name().to_string()),
    }
}

fn changed_ident(graph: &FileGraph, id: NodeId, role: IdentRole) -> Option<ChangedIdent> {
    let name = graph.arena.node(id).name.clone()?;
    Some(ChangedIdent {
        name,
        path: graph.arena.node_path(id),
        role,
    })
}

fn effect_link(graph: &FileGraph, cause: NodeId) -> Option<EffectLink> {
    let effects = &graph.annotation(cause).effects;
    if effects.is_empty() {
        return None;
    }
    Some(EffectLink {
        cause_name: graph
            .arena
            .node(cause)
            .name
            .clone()
            .unwrap_or_else(|| graph.arena.node(cause).kind.name().to_string()),
        cause_path: graph.arena.node_path(cause),
        effect_paths: effects.iter().map(|&e| graph.arena.node_path(e)).collect(),
    })
}

fn push_with_effects(
    graph: &FileGraph,
    id: NodeId,
    role: IdentRole,
    change: &mut ClassifiedChange,
) {
    if let Some(ident) = changed_ident(graph, id, role) {
        change.idents.push(ident);
    }
    if let Some(link) = effect_link(graph, id) {
        change.effects.push(link);
    }
}

fn extract(graph: &FileGraph, node: NodeId, class: ChangeClass, side: DiffSide) -> ClassifiedChange {
    let mut change = ClassifiedChange {
        class: class.clone(),
        side,
        node_path: graph.arena.node_path(node),
        idents: Vec::new(),
        effects: Vec::new(),
    };
    match class {
        ChangeClass::Import => extract_import(graph, node, &mut change),
        ChangeClass::Declaration => extract_declaration(graph, node, &mut change),
        ChangeClass::SelfUpdate => {
            if let Some(argument) = graph.arena.child_by_field(node, Field::Argument) {
                for id in reference_identifiers(graph, argument) {
                    push_with_effects(graph, id, IdentRole::Plain, &mut change);
                }
            }
        }
        ChangeClass::Invoke => {
            if let Some(callee) = graph.arena.child_by_field(node, Field::Callee) {
                for id in reference_identifiers(graph, callee) {
                    push_with_effects(graph, id, IdentRole::Callee, &mut change);
                }
            }
            for arg in graph.arena.children_by_field(node, Field::Arguments) {
                for id in reference_identifiers(graph, arg) {
                    push_with_effects(graph, id, IdentRole::Argument, &mut change);
                }
            }
        }
        ChangeClass::Assignment => {
            if let Some(left) = graph.arena.child_by_field(node, Field::Left) {
                for id in reference_identifiers(graph, left) {
                    push_with_effects(graph, id, IdentRole::Left, &mut change);
                }
            }
            if let Some(right) = graph.arena.child_by_field(node, Field::Right) {
                for id in reference_identifiers(graph, right) {
                    if let Some(ident) = changed_ident(graph, id, IdentRole::Right) {
                        change.idents.push(ident);
                    }
                }
            }
        }
        ChangeClass::Other(_) => {
            let arena = &graph.arena;
            for id in std::iter::once(node).chain(arena.descendants(node)) {
                let kind = arena.node(id).kind;
                if matches!(kind, NodeKind::Identifier | NodeKind::JsxIdentifier | NodeKind::Literal)
                {
                    if let Some(ident) = changed_ident(graph, id, IdentRole::Plain) {
                        change.idents.push(ident);
                    }
                }
            }
        }
    }
    change
}

fn extract_import(graph: &FileGraph, node: NodeId, change: &mut ClassifiedChange) {
    let specifiers: Vec<NodeId> = if graph.arena.node(node).kind == NodeKind::ImportDeclaration {
        graph
            .arena
            .children_by_field(node, Field::Specifiers)
            .collect()
    } else {
        vec![node]
    };
    for spec in specifiers {
        if let Some(local) = graph.arena.child_by_field(spec, Field::Local) {
            push_with_effects(graph, local, IdentRole::Plain, change);
        }
    }
}

fn extract_declaration(graph: &FileGraph, node: NodeId, change: &mut ClassifiedChange) {
    let kind = graph.arena.node(node).kind;
    match kind {
        NodeKind::VariableDeclaration | NodeKind::VariableDeclarator => {
            let declarators: Vec<NodeId> = if kind == NodeKind::VariableDeclaration {
                graph
                    .arena
                    .children_by_field(node, Field::Declarations)
                    .collect()
            } else {
                vec![node]
            };
            for declarator in declarators {
                if let Some(pattern) = graph.arena.child_by_field(declarator, Field::Id) {
                    for id in crate::scope::pattern_identifiers(&graph.arena, pattern) {
                        push_with_effects(graph, id, IdentRole::Id, change);
                    }
                }
                let Some(init) = graph.arena.child_by_field(declarator, Field::Init) else {
                    continue;
                };
                // Function-valued initializers contribute through their own
                // statements, not as value dependencies of the name.
                if graph.arena.node(init).kind.is_function_like() {
                    continue;
                }
                for id in reference_identifiers(graph, init) {
                    if let Some(ident) = changed_ident(graph, id, IdentRole::Init) {
                        change.idents.push(ident);
                    }
                }
            }
        }
        NodeKind::FunctionDeclaration | NodeKind::ClassDeclaration => {
            if let Some(id) = graph.arena.child_by_field(node, Field::Id) {
                push_with_effects(graph, id, IdentRole::Id, change);
            }
        }
        // A destructuring sub-node of a declarator: its identifiers are
        // declared names.
        _ => {
            for id in crate::scope::pattern_identifiers(&graph.arena, node) {
                push_with_effects(graph, id, IdentRole::Id, change);
            }
        }
    }
}

/// Cancel identifier paths appearing in both the added and removed sets of
/// one file (moved-not-edited), and the overlapping effect paths likewise.
/// Idempotent: a second pass finds nothing left to cancel.
pub fn reconcile(mut changes: Vec<ClassifiedChange>) -> Vec<ClassifiedChange> {
    let added_paths: Vec<&str> = ident_paths(&changes, DiffSide::Added);
    let removed_paths: Vec<&str> = ident_paths(&changes, DiffSide::Removed);
    let shared: Vec<String> = added_paths
        .iter()
        .filter(|p| removed_paths.contains(p))
        .map(|p| p.to_string())
        .collect();

    let added_fx: Vec<&str> = effect_paths(&changes, DiffSide::Added);
    let removed_fx: Vec<&str> = effect_paths(&changes, DiffSide::Removed);
    let shared_fx: Vec<String> = added_fx
        .iter()
        .filter(|p| removed_fx.contains(p))
        .map(|p| p.to_string())
        .collect();

    for change in &mut changes {
        change
            .idents
            .retain(|ident| !shared.contains(&ident.path));
        for link in &mut change.effects {
            link.effect_paths.retain(|path| !shared_fx.contains(path));
        }
        change.effects.retain(|link| !link.effect_paths.is_empty());
    }
    changes
}

fn ident_paths(changes: &[ClassifiedChange], side: DiffSide) -> Vec<&str> {
    changes
        .iter()
        .filter(|c| c.side == side)
        .flat_map(|c| c.idents.iter().map(|i| i.path.as_str()))
        .collect()
}

fn effect_paths(changes: &[ClassifiedChange], side: DiffSide) -> Vec<&str> {
    changes
        .iter()
        .filter(|c| c.side == side)
        .flat_map(|c| c.effects.iter().flat_map(|l| l.effect_paths.iter().map(String::as_str)))
        .collect()
}
