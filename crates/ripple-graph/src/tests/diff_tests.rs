use super::graph_of;
use crate::diff::{
    map_hunk, reconcile, ChangeClass, DiffHunk, DiffSide, IdentRole,
};
use crate::report::FileChangeKind;

fn hunk(
    file: &str,
    old_start: u32,
    new_start: u32,
    lines: &[&str],
) -> DiffHunk {
    DiffHunk {
        file_path: file.to_string(),
        change_kind: FileChangeKind::Modified,
        old_start,
        old_count: lines.iter().filter(|l| l.starts_with('-')).count() as u32,
        new_start,
        new_count: lines.iter().filter(|l| l.starts_with('+')).count() as u32,
        lines: lines.iter().map(|l| l.to_string()).collect(),
    }
}

#[test]
fn declaration_hunk_splits_id_from_value_dependencies() {
    let graph = graph_of("test.ts", "const b = 1;\nconst c = 2;\nconst a = b + c;\n");
    let change_hunk = hunk("test.ts", 3, 3, &["+const a = b + c;"]);
    let changes = map_hunk(&change_hunk, None, Some(&graph));

    assert_eq!(changes.len(), 1);
    let change = &changes[0];
    assert_eq!(change.class, ChangeClass::Declaration);
    assert_eq!(change.side, DiffSide::Added);

    let ids: Vec<&str> = change
        .idents
        .iter()
        .filter(|i| i.role == IdentRole::Id)
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(ids, vec!["a"]);

    let init_deps: Vec<&str> = change
        .idents
        .iter()
        .filter(|i| i.role == IdentRole::Init)
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(init_deps, vec!["b", "c"]);

    // The declared name carries its effect set (the initializer references).
    assert_eq!(change.effects.len(), 1);
    assert_eq!(change.effects[0].cause_name, "a");
    assert_eq!(change.effects[0].effect_paths.len(), 2);
}

#[test]
fn a_whole_function_yields_exactly_one_top_node() {
    let graph = graph_of(
        "test.ts",
        "function add(a, b) {\n  const sum = a + b;\n  return sum;\n}\n",
    );
    let change_hunk = hunk(
        "test.ts",
        1,
        1,
        &[
            "+function add(a, b) {",
            "+  const sum = a + b;",
            "+  return sum;",
            "+}",
        ],
    );
    let changes = map_hunk(&change_hunk, None, Some(&graph));
    assert_eq!(changes.len(), 1, "inner statements fold into the declaration");
    assert_eq!(changes[0].class, ChangeClass::Declaration);
    let ids: Vec<&str> = changes[0].idents.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(ids, vec!["add"]);
}

#[test]
fn whitespace_only_hunks_yield_empty_results() {
    let graph = graph_of("test.ts", "const a = 1;\n\n\nconst b = 2;\n");
    let change_hunk = hunk("test.ts", 2, 2, &["+", "+"]);
    let changes = map_hunk(&change_hunk, Some(&graph), Some(&graph));
    assert!(changes.is_empty());
}

#[test]
fn expression_statements_unwrap_before_classification() {
    let graph = graph_of("test.ts", "let n = 0;\nn = n + 1;\nupdate(n);\nn++;\n");
    let assignment = map_hunk(&hunk("test.ts", 2, 2, &["+n = n + 1;"]), None, Some(&graph));
    assert_eq!(assignment[0].class, ChangeClass::Assignment);
    let left: Vec<&str> = assignment[0]
        .idents
        .iter()
        .filter(|i| i.role == IdentRole::Left)
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(left, vec!["n"]);

    let invoke = map_hunk(&hunk("test.ts", 3, 3, &["+update(n);"]), None, Some(&graph));
    assert_eq!(invoke[0].class, ChangeClass::Invoke);
    let roles: Vec<IdentRole> = invoke[0].idents.iter().map(|i| i.role).collect();
    assert!(roles.contains(&IdentRole::Callee));
    assert!(roles.contains(&IdentRole::Argument));

    let update = map_hunk(&hunk("test.ts", 4, 4, &["+n++;"]), None, Some(&graph));
    assert_eq!(update[0].class, ChangeClass::SelfUpdate);
}

#[test]
fn import_hunks_classify_as_import() {
    let graph = graph_of("test.ts", "import { add } from './util';\nadd(1, 2);\n");
    let changes = map_hunk(
        &hunk("test.ts", 1, 1, &["+import { add } from './util';"]),
        None,
        Some(&graph),
    );
    assert_eq!(changes[0].class, ChangeClass::Import);
    assert_eq!(changes[0].idents[0].name, "add");
}

#[test]
fn unknown_statements_tag_their_concrete_kind() {
    let graph = graph_of("test.ts", "debugger;\n");
    let changes = map_hunk(&hunk("test.ts", 1, 1, &["+debugger;"]), None, Some(&graph));
    assert_eq!(
        changes[0].class,
        ChangeClass::Other("DebuggerStatement".to_string())
    );
}

#[test]
fn moved_statements_cancel_out() {
    let old_graph = graph_of("test.ts", "const a = 1;\n");
    let new_graph = graph_of("test.ts", "const pad = 0;\nconst a = 1;\n");
    let change_hunk = hunk(
        "test.ts",
        1,
        1,
        &["+const pad = 0;", "-const a = 1;", "+const a = 1;"],
    );
    let changes = map_hunk(&change_hunk, Some(&old_graph), Some(&new_graph));
    let reconciled = reconcile(changes);

    let surviving: Vec<&str> = reconciled
        .iter()
        .flat_map(|c| c.idents.iter().map(|i| i.name.as_str()))
        .collect();
    assert_eq!(surviving, vec!["pad"], "the moved declaration cancelled");
}

#[test]
fn reconcile_is_idempotent() {
    let old_graph = graph_of("test.ts", "const a = 1;\nconst b = a;\n");
    let new_graph = graph_of("test.ts", "const b = 7;\nconst a = 1;\n");
    let change_hunk = hunk(
        "test.ts",
        1,
        1,
        &["-const a = 1;", "-const b = a;", "+const b = 7;", "+const a = 1;"],
    );
    let changes = map_hunk(&change_hunk, Some(&old_graph), Some(&new_graph));
    let once = reconcile(changes);
    let twice = reconcile(once.clone());
    assert_eq!(once, twice);
}
