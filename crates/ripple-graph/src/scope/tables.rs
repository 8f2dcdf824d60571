//! Import/export table assembly.
//!
//! Runs once per file, at the Program node, after scope resolution. Records
//! are grouped the way the statements appear: imports per source specifier,
//! exports per upstream source (`None` for the file's own exports).

use crate::arena::{Field, NodeId, NodeKind};

use super::{pattern_identifiers, ExportMember, ExportRecord, FileGraph, ImportMember, ImportRecord};

pub(crate) fn build_tables(graph: &mut FileGraph) {
    let Some(root) = graph.arena.root() else {
        return;
    };
    let statements = graph.arena.node(root).children.clone();
    for stmt in statements {
        match graph.arena.node(stmt).kind {
            NodeKind::ImportDeclaration => import_record(graph, stmt),
            NodeKind::ExportAllDeclaration => export_all_record(graph, stmt),
            NodeKind::ExportNamedDeclaration => export_named_record(graph, stmt),
            NodeKind::ExportDefaultDeclaration => {
                push_export_member(graph, None, "default", "default");
            }
            _ => {}
        }
    }
}

fn source_of(graph: &FileGraph, stmt: NodeId) -> Option<String> {
    graph
        .arena
        .child_by_field(stmt, Field::Source)
        .and_then(|s| graph.arena.node(s).name.clone())
}

fn import_record(graph: &mut FileGraph, stmt: NodeId) {
    let Some(source) = source_of(graph, stmt) else {
        return;
    };
    let mut members = Vec::new();
    let specifiers: Vec<NodeId> = graph
        .arena
        .children_by_field(stmt, Field::Specifiers)
        .collect();
    for spec in specifiers {
        let Some(local) = graph
            .arena
            .child_by_field(spec, Field::Local)
            .and_then(|l| graph.arena.node(l).name.clone())
        else {
            continue;
        };
        let imported = match graph.arena.node(spec).kind {
            NodeKind::ImportDefaultSpecifier => "default".to_string(),
            NodeKind::ImportNamespaceSpecifier => "*".to_string(),
            _ => graph
                .arena
                .child_by_field(spec, Field::Imported)
                .and_then(|i| graph.arena.node(i).name.clone())
                .unwrap_or_else(|| local.clone()),
        };
        members.push(ImportMember { local, imported });
    }
    // Zero specifiers still registers a whole-module (side-effect) import.
    graph.imports.push(ImportRecord { source, members });
}

fn export_all_record(graph: &mut FileGraph, stmt: NodeId) {
    let Some(source) = source_of(graph, stmt) else {
        return;
    };
    let exported = graph
        .arena
        .child_by_field(stmt, Field::Exported)
        .and_then(|e| graph.arena.node(e).name.clone());
    match exported {
        // `export * as ns from 'x'` exposes one concrete member.
        Some(ns) => {
            let idx = find_or_create(graph, Some(source), false);
            graph.exports[idx].members.push(ExportMember {
                local: "*".to_string(),
                exported: ns,
            });
        }
        None => {
            find_or_create(graph, Some(source), true);
        }
    }
}

fn export_named_record(graph: &mut FileGraph, stmt: NodeId) {
    let source = source_of(graph, stmt);
    let specifiers: Vec<NodeId> = graph
        .arena
        .children_by_field(stmt, Field::Specifiers)
        .collect();
    for spec in specifiers {
        let local = graph
            .arena
            .child_by_field(spec, Field::Local)
            .and_then(|l| graph.arena.node(l).name.clone());
        let exported = graph
            .arena
            .child_by_field(spec, Field::Exported)
            .and_then(|e| graph.arena.node(e).name.clone());
        if let (Some(local), Some(exported)) = (local, exported) {
            push_export_member(graph, source.clone(), &local, &exported);
        }
    }

    let Some(declaration) = graph.arena.child_by_field(stmt, Field::Declaration) else {
        return;
    };
    match graph.arena.node(declaration).kind {
        NodeKind::VariableDeclaration => {
            let declarators: Vec<NodeId> = graph
                .arena
                .children_by_field(declaration, Field::Declarations)
                .collect();
            for declarator in declarators {
                let Some(pattern) = graph.arena.child_by_field(declarator, Field::Id) else {
                    continue;
                };
                let names: Vec<String> = pattern_identifiers(&graph.arena, pattern)
                    .into_iter()
                    .filter_map(|id| graph.arena.node(id).name.clone())
                    .collect();
                for name in names {
                    push_export_member(graph, None, &name, &name);
                }
            }
        }
        NodeKind::FunctionDeclaration
        | NodeKind::ClassDeclaration
        | NodeKind::TsEnumDeclaration
        | NodeKind::TsInterfaceDeclaration
        | NodeKind::TsTypeAliasDeclaration => {
            if let Some(name) = graph
                .arena
                .child_by_field(declaration, Field::Id)
                .and_then(|id| graph.arena.node(id).name.clone())
            {
                push_export_member(graph, None, &name, &name);
            }
        }
        _ => {}
    }
}

fn push_export_member(graph: &mut FileGraph, source: Option<String>, local: &str, exported: &str) {
    let idx = find_or_create(graph, source, false);
    graph.exports[idx].members.push(ExportMember {
        local: local.to_string(),
        exported: exported.to_string(),
    });
}

fn find_or_create(graph: &mut FileGraph, source: Option<String>, export_all: bool) -> usize {
    let position = graph
        .exports
        .iter()
        .position(|record| record.source == source && record.export_all == export_all);
    match position {
        Some(idx) => idx,
        None => {
            graph.exports.push(ExportRecord {
                source,
                members: Vec::new(),
                export_all,
            });
            graph.exports.len() - 1
        }
    }
}
