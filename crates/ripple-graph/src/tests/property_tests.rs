//! Property-based coverage for the invariants that must hold on any input:
//! building a scope graph is deterministic, and diff reconciliation is
//! idempotent.

use proptest::prelude::*;

use super::graph_of;
use crate::diff::{reconcile, ChangeClass, ChangedIdent, ClassifiedChange, DiffSide, IdentRole};

/// Small statement pool; programs are arbitrary sequences drawn from it.
const STATEMENTS: &[&str] = &[
    "const a = 1;",
    "const b = a + 1;",
    "let c = b;",
    "c = a + b;",
    "function f(x) { return x + a; }",
    "f(b);",
    "export const d = f(c);",
    "c++;",
];

fn program() -> impl Strategy<Value = String> {
    proptest::collection::vec(0..STATEMENTS.len(), 1..8)
        .prop_map(|picks| {
            picks
                .into_iter()
                .map(|i| STATEMENTS[i])
                .collect::<Vec<_>>()
                .join("\n")
        })
}

/// Observable annotation facts, extracted for comparison.
fn fingerprint(source: &str) -> Vec<(u32, Option<&'static str>, bool, Option<u32>, usize)> {
    let graph = graph_of("prop.ts", source);
    graph
        .arena
        .ids()
        .map(|id| {
            let ann = graph.annotation(id);
            (
                id.0,
                ann.binding.map(|k| match k {
                    crate::scope::BindingKind::Import => "import",
                    crate::scope::BindingKind::Variable => "variable",
                    crate::scope::BindingKind::Function => "function",
                    crate::scope::BindingKind::Class => "class",
                    crate::scope::BindingKind::Param => "param",
                    crate::scope::BindingKind::Enum => "enum",
                    crate::scope::BindingKind::Interface => "interface",
                    crate::scope::BindingKind::TypeAlias => "type-alias",
                }),
                ann.is_reference,
                ann.resolved_scope.first().map(|b| b.0),
                ann.effects.len(),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn scope_graph_construction_is_deterministic(source in program()) {
        prop_assert_eq!(fingerprint(&source), fingerprint(&source));
    }

    #[test]
    fn references_resolve_to_a_binding_with_the_same_name(source in program()) {
        let graph = graph_of("prop.ts", &source);
        for id in graph.arena.ids() {
            let ann = graph.annotation(id);
            if let Some(&chosen) = ann.resolved_scope.first() {
                prop_assert_eq!(
                    graph.arena.node(id).name.as_deref(),
                    graph.arena.node(chosen).name.as_deref()
                );
                prop_assert!(graph.annotation(chosen).binding.is_some());
                prop_assert!(graph.annotation(chosen).occupation.contains(&id));
            }
        }
    }
}

fn arbitrary_change() -> impl Strategy<Value = ClassifiedChange> {
    let ident = ("[a-d]", 0..4u8).prop_map(|(name, path)| ChangedIdent {
        name: name.clone(),
        path: format!("Program:VariableDeclaration:Identifier:{name}{path}"),
        role: IdentRole::Plain,
    });
    (
        prop_oneof![Just(DiffSide::Added), Just(DiffSide::Removed)],
        proptest::collection::vec(ident, 0..5),
    )
        .prop_map(|(side, idents)| ClassifiedChange {
            class: ChangeClass::Declaration,
            side,
            node_path: "Program:VariableDeclaration:".to_string(),
            idents,
            effects: Vec::new(),
        })
}

proptest! {
    #[test]
    fn reconciliation_is_idempotent(changes in proptest::collection::vec(arbitrary_change(), 0..8)) {
        let once = reconcile(changes);
        let twice = reconcile(once.clone());
        prop_assert_eq!(once, twice);
    }
}
