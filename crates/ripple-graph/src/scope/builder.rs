//! Two-phase scope annotation.
//!
//! Each hoisting scope (Program, block) runs two passes: pass 1 scans direct
//! children only and registers hoistable bindings; pass 2 recurses into every
//! child, nested scopes running their own pass 1/pass 2 on entry. Reference
//! resolution therefore always sees a scope's bindings before any reference
//! inside it, which is what makes forward references to hoisted declarations
//! resolve.

use rustc_hash::FxHashMap;

use crate::arena::{AstArena, Field, NodeId, NodeKind};
use crate::report::{Diagnostic, DiagnosticKind};

use super::{
    allowlisted, pattern_identifiers, Annotation, BindingKind, FileGraph, ScopeTable,
};
use super::{effects, tables};

/// Annotate a lowered arena into a [`FileGraph`].
pub fn build(arena: AstArena, file_path: impl Into<String>) -> FileGraph {
    let file_path = file_path.into();
    let annotations = vec![Annotation::default(); arena.len()];
    let mut graph = FileGraph {
        file_path,
        arena,
        annotations,
        scopes: FxHashMap::default(),
        line_index: FxHashMap::default(),
        path_index: FxHashMap::default(),
        imports: Vec::new(),
        exports: Vec::new(),
        diagnostics: Vec::new(),
    };
    let Some(root) = graph.arena.root() else {
        return graph;
    };

    build_line_index(&mut graph);
    {
        let FileGraph {
            arena,
            annotations,
            scopes,
            diagnostics,
            file_path,
            ..
        } = &mut graph;
        let mut walker = Walker {
            arena,
            annotations,
            scopes,
            diagnostics,
            file_path,
            scope_stack: Vec::new(),
        };
        walker.visit_scope(root);
    }
    effects::compute_effects(&mut graph);
    tables::build_tables(&mut graph);
    build_path_index(&mut graph);
    graph
}

fn build_line_index(graph: &mut FileGraph) {
    for id in graph.arena.ids().collect::<Vec<_>>() {
        let span = graph.arena.node(id).span;
        for line in span.start_line..=span.end_line {
            graph.line_index.entry(line).or_default().push(id);
        }
    }
}

fn build_path_index(graph: &mut FileGraph) {
    for id in graph.arena.ids().collect::<Vec<_>>() {
        let path = graph.arena.node_path(id);
        graph.path_index.entry(path).or_default().push(id);
    }
}

struct Walker<'a> {
    arena: &'a AstArena,
    annotations: &'a mut Vec<Annotation>,
    scopes: &'a mut FxHashMap<NodeId, ScopeTable>,
    diagnostics: &'a mut Vec<Diagnostic>,
    file_path: &'a str,
    scope_stack: Vec<NodeId>,
}

impl Walker<'_> {
    fn bind(&mut self, id: NodeId, kind: BindingKind, scope: NodeId) {
        let ann = &mut self.annotations[id.index()];
        if ann.binding.is_some() {
            return;
        }
        ann.binding = Some(kind);
        if let Some(name) = self.arena.node(id).name.clone() {
            self.scopes.entry(scope).or_default().add(&name, id);
        }
    }

    /// Pass 1: register hoistable bindings from a scope's direct children.
    /// Export wrappers are unwrapped so `export const x` still binds `x`.
    fn hoist(&mut self, scope: NodeId) {
        let statements = self.arena.node(scope).children.clone();
        for stmt in statements {
            let target = match self.arena.node(stmt).kind {
                NodeKind::ExportNamedDeclaration | NodeKind::ExportDefaultDeclaration => self
                    .arena
                    .child_by_field(stmt, Field::Declaration)
                    .unwrap_or(stmt),
                _ => stmt,
            };
            match self.arena.node(target).kind {
                NodeKind::ImportDeclaration => {
                    let specifiers: Vec<NodeId> = self
                        .arena
                        .children_by_field(target, Field::Specifiers)
                        .collect();
                    for spec in specifiers {
                        if let Some(local) = self.arena.child_by_field(spec, Field::Local) {
                            self.bind(local, BindingKind::Import, scope);
                        }
                    }
                }
                NodeKind::FunctionDeclaration => {
                    self.bind_id_child(target, BindingKind::Function, scope);
                }
                NodeKind::ClassDeclaration => {
                    self.bind_id_child(target, BindingKind::Class, scope);
                }
                NodeKind::TsEnumDeclaration => {
                    self.bind_id_child(target, BindingKind::Enum, scope);
                }
                NodeKind::TsInterfaceDeclaration => {
                    self.bind_id_child(target, BindingKind::Interface, scope);
                }
                NodeKind::TsTypeAliasDeclaration => {
                    self.bind_id_child(target, BindingKind::TypeAlias, scope);
                }
                NodeKind::VariableDeclaration => {
                    let declarators: Vec<NodeId> = self
                        .arena
                        .children_by_field(target, Field::Declarations)
                        .collect();
                    for declarator in declarators {
                        if let Some(pattern) = self.arena.child_by_field(declarator, Field::Id) {
                            for ident in pattern_identifiers(self.arena, pattern) {
                                self.bind(ident, BindingKind::Variable, scope);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn bind_id_child(&mut self, declaration: NodeId, kind: BindingKind, scope: NodeId) {
        if let Some(id) = self.arena.child_by_field(declaration, Field::Id) {
            self.bind(id, kind, scope);
        }
    }

    /// Pass 1 then pass 2 for one scope node.
    fn visit_scope(&mut self, scope: NodeId) {
        self.hoist(scope);
        self.scope_stack.push(scope);
        let children = self.arena.node(scope).children.clone();
        for child in children {
            self.walk(child);
        }
        self.scope_stack.pop();
    }

    fn walk(&mut self, id: NodeId) {
        let kind = self.arena.node(id).kind;
        match kind {
            NodeKind::BlockStatement => self.visit_scope(id),
            k if k.is_function_like() => self.walk_function(id),
            NodeKind::CatchClause => {
                if let (Some(param), Some(body)) = (
                    self.arena.child_by_field(id, Field::Param),
                    self.arena.child_by_field(id, Field::Body),
                ) {
                    for ident in pattern_identifiers(self.arena, param) {
                        self.bind(ident, BindingKind::Param, body);
                    }
                }
                let children = self.arena.node(id).children.clone();
                for child in children {
                    self.walk(child);
                }
            }
            NodeKind::Identifier | NodeKind::JsxIdentifier => self.classify_reference(id),
            _ => {
                let children = self.arena.node(id).children.clone();
                for child in children {
                    self.walk(child);
                }
            }
        }
    }

    /// Functions bind their parameters into the body scope before the body
    /// hoists, so parameters shadow outer bindings and defaults resolve
    /// inside the function.
    fn walk_function(&mut self, func: NodeId) {
        let body = self
            .arena
            .child_by_field(func, Field::Body)
            .filter(|&b| self.arena.node(b).kind == NodeKind::BlockStatement);
        if let Some(body) = body {
            let params: Vec<NodeId> = self.arena.children_by_field(func, Field::Params).collect();
            for param in params {
                for ident in pattern_identifiers(self.arena, param) {
                    self.bind(ident, BindingKind::Param, body);
                }
            }
            self.hoist(body);
            self.scope_stack.push(body);
        }
        let children = self.arena.node(func).children.clone();
        for child in children {
            if self.arena.node(child).field == Field::Id {
                continue;
            }
            if Some(child) == body {
                // The body scope is already on the stack; walk its
                // statements without re-entering it.
                let statements = self.arena.node(child).children.clone();
                for stmt in statements {
                    self.walk(stmt);
                }
            } else {
                self.walk(child);
            }
        }
        if body.is_some() {
            self.scope_stack.pop();
        }
    }

    fn classify_reference(&mut self, id: NodeId) {
        if self.annotations[id.index()].binding.is_some() {
            return;
        }
        let node = self.arena.node(id);
        let Some(name) = node.name.clone() else {
            return;
        };
        match node.kind {
            NodeKind::JsxIdentifier => {
                // Only opening-tag names read a value; closing tags and
                // attribute names never count as references.
                let parent_kind = node.parent.map(|p| self.arena.node(p).kind);
                if !matches!(parent_kind, Some(NodeKind::JsxOpeningElement)) {
                    return;
                }
            }
            NodeKind::Identifier => {
                if self.is_excluded_position(id) {
                    return;
                }
            }
            _ => return,
        }

        self.annotations[id.index()].is_reference = true;
        let mut candidates: Vec<NodeId> = Vec::new();
        for scope in self.scope_stack.iter().rev() {
            if let Some(table) = self.scopes.get(scope) {
                candidates.extend_from_slice(table.get(&name));
            }
        }
        if candidates.is_empty() {
            if !allowlisted(self.arena, id) {
                let span = self.arena.node(id).span;
                tracing::debug!(file = self.file_path, name = %name, "untracked identifier");
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnresolvedReference,
                    self.file_path,
                    format!(
                        "untracked identifier {} ({}:{})",
                        name, span.start_line, span.start_column
                    ),
                ));
            }
            return;
        }
        let chosen = candidates[0];
        self.annotations[id.index()].resolved_scope = candidates;
        if chosen != id {
            self.annotations[chosen.index()].occupation.push(id);
        }
    }

    /// Identifier positions that never count as references: non-computed
    /// member/key names, import/export member names, re-export locals, and
    /// declaration-position identifiers.
    fn is_excluded_position(&self, id: NodeId) -> bool {
        let node = self.arena.node(id);
        let Some(parent) = node.parent else {
            return true;
        };
        let parent_kind = self.arena.node(parent).kind;
        match node.field {
            Field::Property | Field::Key => {
                let computed = matches!(
                    parent_kind,
                    NodeKind::MemberExpression { computed: true }
                        | NodeKind::Property { computed: true }
                        | NodeKind::MethodDefinition { computed: true }
                        | NodeKind::PropertyDefinition { computed: true }
                );
                if !computed {
                    return true;
                }
            }
            Field::Imported | Field::Exported => return true,
            Field::Local => {
                if parent_kind == NodeKind::ExportSpecifier {
                    if let Some(export_stmt) = self.arena.node(parent).parent {
                        if self
                            .arena
                            .child_by_field(export_stmt, Field::Source)
                            .is_some()
                        {
                            return true;
                        }
                    }
                }
            }
            _ => {}
        }
        self.is_declaration_position(id)
    }

    /// True when the identifier sits in a binding slot (declarator pattern,
    /// parameter pattern, declaration id) rather than an expression.
    fn is_declaration_position(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let node = self.arena.node(current);
            let Some(parent) = node.parent else {
                return false;
            };
            match self.arena.node(parent).kind {
                NodeKind::VariableDeclarator => return node.field == Field::Id,
                NodeKind::CatchClause => return node.field == Field::Param,
                NodeKind::FunctionDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::ArrowFunctionExpression => {
                    return matches!(node.field, Field::Id | Field::Params);
                }
                NodeKind::ClassDeclaration
                | NodeKind::ClassExpression
                | NodeKind::TsEnumDeclaration
                | NodeKind::TsInterfaceDeclaration
                | NodeKind::TsTypeAliasDeclaration => return node.field == Field::Id,
                NodeKind::AssignmentPattern => {
                    if node.field == Field::Right {
                        return false;
                    }
                    current = parent;
                }
                NodeKind::Property { .. } => {
                    if node.field == Field::Key {
                        return false;
                    }
                    current = parent;
                }
                NodeKind::ObjectPattern | NodeKind::ArrayPattern | NodeKind::RestElement => {
                    current = parent;
                }
                _ => return false,
            }
        }
    }
}
