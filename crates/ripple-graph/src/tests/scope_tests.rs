use super::graph_of;
use crate::arena::NodeId;
use crate::scope::BindingKind;

/// All reference identifiers named `name`.
fn references_named(graph: &crate::scope::FileGraph, name: &str) -> Vec<NodeId> {
    graph
        .arena
        .ids()
        .filter(|&id| {
            graph.annotation(id).is_reference
                && graph.arena.node(id).name.as_deref() == Some(name)
        })
        .collect()
}

#[test]
fn shadowing_prefers_the_nearest_binding() {
    let graph = graph_of(
        "test.ts",
        "const x = 1;\nfunction f(x) {\n  return x;\n}\n",
    );
    let refs = references_named(&graph, "x");
    assert_eq!(refs.len(), 1, "only the return reads x");
    let reference = refs[0];
    let chosen = graph.chosen_binding(reference).expect("resolved");
    assert_eq!(
        graph.annotation(chosen).binding,
        Some(BindingKind::Param),
        "the parameter shadows the outer const"
    );
    // The outer const is still a later candidate.
    let candidates = &graph.annotation(reference).resolved_scope;
    assert!(candidates.len() >= 2);
    assert_eq!(
        graph.annotation(candidates[candidates.len() - 1]).binding,
        Some(BindingKind::Variable)
    );
    // Occupation is the reverse edge.
    assert!(graph.annotation(chosen).occupation.contains(&reference));
}

#[test]
fn hoisting_resolves_forward_references() {
    let graph = graph_of(
        "test.ts",
        "function g() {\n  return helper();\n}\nfunction helper() {\n  return 1;\n}\n",
    );
    let refs = references_named(&graph, "helper");
    assert_eq!(refs.len(), 1);
    let chosen = graph.chosen_binding(refs[0]).expect("resolved");
    assert_eq!(graph.annotation(chosen).binding, Some(BindingKind::Function));
    assert!(graph.untracked_references().is_empty());
}

#[test]
fn untracked_detection_respects_the_allow_list() {
    let graph = graph_of(
        "test.ts",
        "const a = mystery + 1;\nwindow.addEventListener(\"load\", a);\n",
    );
    let untracked = graph.untracked_references();
    let names: Vec<&str> = untracked
        .iter()
        .filter_map(|&id| graph.arena.node(id).name.as_deref())
        .collect();
    assert_eq!(names, vec!["mystery"], "window is allow-listed, a resolves");
    assert_eq!(graph.diagnostics.len(), 1);
}

#[test]
fn jsx_intrinsics_are_not_untracked() {
    let graph = graph_of(
        "app.tsx",
        "export function App() {\n  return <div className=\"x\">{value}</div>;\n}\n",
    );
    let names: Vec<&str> = graph
        .untracked_references()
        .iter()
        .filter_map(|&id| graph.arena.node(id).name.as_deref())
        .collect();
    assert_eq!(names, vec!["value"]);
}

#[test]
fn component_tags_resolve_to_their_import() {
    let graph = graph_of(
        "app.tsx",
        "import { Button } from './button';\nexport function App() {\n  return <Button />;\n}\n",
    );
    let refs = references_named(&graph, "Button");
    assert_eq!(refs.len(), 1);
    let chosen = graph.chosen_binding(refs[0]).expect("resolved");
    assert_eq!(graph.annotation(chosen).binding, Some(BindingKind::Import));
}

#[test]
fn declarator_effects_are_the_initializer_references() {
    let graph = graph_of("test.ts", "const b = 1;\nconst c = 2;\nconst a = b + c;\n");
    let a_binding = graph.program_bindings("a")[0];
    let effect_names: Vec<&str> = graph
        .annotation(a_binding)
        .effects
        .iter()
        .filter_map(|&id| graph.arena.node(id).name.as_deref())
        .collect();
    assert_eq!(effect_names, vec!["b", "c"]);
}

#[test]
fn getter_setter_destructure_splits_effects() {
    let graph = graph_of(
        "component.ts",
        "export function component(initial) {\n  const [state, setState] = useState(initial);\n  return state;\n}\n",
    );
    let state = graph
        .arena
        .ids()
        .find(|&id| {
            graph.arena.node(id).name.as_deref() == Some("state")
                && graph.annotation(id).binding.is_some()
        })
        .expect("state binding");
    let effect_names: Vec<&str> = graph
        .annotation(state)
        .effects
        .iter()
        .filter_map(|&id| graph.arena.node(id).name.as_deref())
        .collect();
    assert!(effect_names.contains(&"initial"), "call argument feeds the getter");
    assert!(effect_names.contains(&"setState"), "the setter half feeds the getter");
}

#[test]
fn assignment_effects_flow_right_to_left() {
    let graph = graph_of("test.ts", "let total = 0;\nconst step = 2;\ntotal = step + 1;\n");
    let refs: Vec<NodeId> = graph
        .arena
        .ids()
        .filter(|&id| {
            graph.annotation(id).is_reference
                && graph.arena.node(id).name.as_deref() == Some("total")
        })
        .collect();
    assert_eq!(refs.len(), 1);
    let effect_names: Vec<&str> = graph
        .annotation(refs[0])
        .effects
        .iter()
        .filter_map(|&id| graph.arena.node(id).name.as_deref())
        .collect();
    assert_eq!(effect_names, vec!["step"]);
}

#[test]
fn call_arguments_back_propagate_to_the_function_name() {
    let graph = graph_of(
        "test.ts",
        "function log(message) {\n  print(message);\n}\n",
    );
    let log_binding = graph.program_bindings("log")[0];
    let effect_names: Vec<&str> = graph
        .annotation(log_binding)
        .effects
        .iter()
        .filter_map(|&id| graph.arena.node(id).name.as_deref())
        .collect();
    assert_eq!(
        effect_names,
        vec!["message"],
        "a call passing the parameter marks the function name"
    );
}

#[test]
fn import_and_export_tables_are_assembled_once() {
    let graph = graph_of(
        "src/index.ts",
        concat!(
            "import def, { named as localName } from './a';\n",
            "import * as ns from './b';\n",
            "import './side-effect';\n",
            "export const out1 = 1;\n",
            "export { localName as out2 };\n",
            "export * from './c';\n",
            "export default def;\n",
        ),
    );

    assert_eq!(graph.imports.len(), 3);
    let first = &graph.imports[0];
    assert_eq!(first.source, "./a");
    assert_eq!(first.members[0].local, "def");
    assert_eq!(first.members[0].imported, "default");
    assert_eq!(first.members[1].local, "localName");
    assert_eq!(first.members[1].imported, "named");
    assert_eq!(graph.imports[1].members[0].imported, "*");
    assert!(graph.imports[2].members.is_empty(), "side-effect import kept");

    let own = graph
        .exports
        .iter()
        .find(|record| record.source.is_none())
        .expect("own exports");
    let exported: Vec<&str> = own.members.iter().map(|m| m.exported.as_str()).collect();
    assert_eq!(exported, vec!["out1", "out2", "default"]);
    assert!(graph
        .exports
        .iter()
        .any(|record| record.export_all && record.source.as_deref() == Some("./c")));
}

#[test]
fn exported_declarations_still_bind_their_names() {
    let graph = graph_of(
        "src/util.ts",
        "export function add(a, b) {\n  return a + b;\n}\nexport const limit = 10;\n",
    );
    assert_eq!(graph.program_bindings("add").len(), 1);
    assert_eq!(graph.program_bindings("limit").len(), 1);
    assert!(graph.untracked_references().is_empty());
}

#[test]
fn destructured_declarations_bind_every_leaf() {
    let graph = graph_of(
        "test.ts",
        "const { a, b: renamed, ...rest } = source;\nconst [first = 0, , third] = list;\n",
    );
    for name in ["a", "renamed", "rest", "first", "third"] {
        assert_eq!(graph.program_bindings(name).len(), 1, "binding for {name}");
    }
    assert!(graph.program_bindings("b").is_empty(), "pattern keys do not bind");
}

#[test]
fn member_properties_are_not_references() {
    let graph = graph_of("test.ts", "const obj = { key: 1 };\nconst v = obj.key;\nconst w = obj[dyn];\n");
    let key_refs: Vec<NodeId> = graph
        .arena
        .ids()
        .filter(|&id| {
            graph.annotation(id).is_reference
                && graph.arena.node(id).name.as_deref() == Some("key")
        })
        .collect();
    assert!(key_refs.is_empty(), "non-computed properties never read");
    // The computed member reads `dyn` (untracked here).
    let names: Vec<&str> = graph
        .untracked_references()
        .iter()
        .filter_map(|&id| graph.arena.node(id).name.as_deref())
        .collect();
    assert_eq!(names, vec!["dyn"]);
}

#[test]
fn line_and_path_lookups_cover_every_node() {
    let graph = graph_of("test.ts", "const a = 1;\nconst b = a;\n");
    assert!(!graph.nodes_at_line(1).is_empty());
    assert!(!graph.nodes_at_line(2).is_empty());
    let a_binding = graph.program_bindings("a")[0];
    let path = graph.arena.node_path(a_binding);
    assert!(graph.nodes_by_path(&path).contains(&a_binding));
}
