use rustc_hash::FxHashSet;

use ripple_config::RippleConfig;

use super::graph_of;
use crate::cache::GraphCache;
use crate::diff::DiffHunk;
use crate::impact::{
    affected_exports_in_range, resolve_transitive, ImpactOptions,
};
use crate::module_graph::MemoryModuleGraph;
use crate::report::{ContributingImport, FileChangeKind};
use crate::resolve::resolve_project;
use crate::source::{MemoryTextSource, TextSource};
use crate::ImpactAnalysis;

fn files(paths: &[&str]) -> FxHashSet<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

#[test]
fn affected_exports_follow_occupation_links() {
    let graph = graph_of(
        "src/util.ts",
        concat!(
            "const base = 10;\n",
            "function scale(n) {\n",
            "  return n * base;\n",
            "}\n",
            "export function add(a, b) {\n",
            "  return scale(a) + b;\n",
            "}\n",
            "export const unrelated = 1;\n",
        ),
    );
    // Touching the private helper reaches the export that uses it.
    assert_eq!(affected_exports_in_range(&graph, 2, 4), vec!["add"]);
    // Touching the export body reaches only that export.
    assert_eq!(affected_exports_in_range(&graph, 6, 6), vec!["add"]);
    assert_eq!(affected_exports_in_range(&graph, 8, 8), vec!["unrelated"]);
}

#[test]
fn vue_files_fall_back_to_their_default_export() {
    let graph = graph_of(
        "src/App.vue",
        "<template>\n  <div/>\n</template>\n<script>\nexport default { name: 'App' };\n</script>\n",
    );
    // A template-only change resolves to no concrete export.
    assert_eq!(affected_exports_in_range(&graph, 1, 2), vec!["default"]);
}

fn project() -> (MemoryTextSource, MemoryTextSource, MemoryModuleGraph) {
    let old: MemoryTextSource = [
        (
            "src/util.ts",
            "export function add(a, b) {\n  return a + b;\n}\n",
        ),
        (
            "src/main.ts",
            "import { add } from './util';\nexport const total = add(1, 2);\n",
        ),
    ]
    .into_iter()
    .collect();
    let new: MemoryTextSource = [
        (
            "src/util.ts",
            "export function add(a, b) {\n  return a + b + 0;\n}\n",
        ),
        (
            "src/main.ts",
            "import { add } from './util';\nexport const total = add(1, 2);\n",
        ),
    ]
    .into_iter()
    .collect();
    let module_graph: MemoryModuleGraph = [
        ("src/main.ts", vec!["src/util.ts"]),
        ("src/util.ts", vec![]),
    ]
    .into_iter()
    .collect();
    (old, new, module_graph)
}

#[test]
fn end_to_end_impact_of_a_body_edit() {
    let (old, new, module_graph) = project();
    let config = RippleConfig::default();
    let analysis = ImpactAnalysis {
        old_source: &old,
        new_source: &new,
        module_graph: &module_graph,
        config: &config,
    };
    let hunks = [DiffHunk {
        file_path: "src/util.ts".to_string(),
        change_kind: FileChangeKind::Modified,
        old_start: 2,
        old_count: 1,
        new_start: 2,
        new_count: 1,
        lines: vec![
            "-  return a + b;".to_string(),
            "+  return a + b + 0;".to_string(),
        ],
    }];
    let outcome = analysis
        .analyze(&hunks, &files(&["src/util.ts", "src/main.ts"]))
        .expect("analyze");

    assert!(!outcome.report.truncated);
    assert_eq!(outcome.report.files.len(), 1);
    let file = &outcome.report.files[0];
    assert_eq!(file.file, "src/util.ts");
    assert_eq!(file.affected_exports, vec!["add"]);

    let importer = file
        .importers
        .iter()
        .find(|i| i.file == "src/main.ts")
        .expect("main.ts is impacted");
    assert_eq!(importer.local_name, "add");
    assert_eq!(
        importer.contributing_imports,
        vec![ContributingImport {
            from_file: "src/util.ts".to_string(),
            local_name: "add".to_string(),
        }]
    );

    // The edit also reaches main.ts's own export through the import.
    assert!(file
        .downstream_exports
        .iter()
        .any(|e| e.file == "src/main.ts" && e.export_name == "total"));
}

#[test]
fn added_files_impact_every_export() {
    let (_, new, module_graph) = project();
    let old = MemoryTextSource::new();
    let config = RippleConfig::default();
    let analysis = ImpactAnalysis {
        old_source: &old,
        new_source: &new,
        module_graph: &module_graph,
        config: &config,
    };
    let hunks = [DiffHunk {
        file_path: "src/util.ts".to_string(),
        change_kind: FileChangeKind::Added,
        old_start: 0,
        old_count: 0,
        new_start: 1,
        new_count: 3,
        lines: vec![
            "+export function add(a, b) {".to_string(),
            "+  return a + b + 0;".to_string(),
            "+}".to_string(),
        ],
    }];
    let outcome = analysis
        .analyze(&hunks, &files(&["src/util.ts", "src/main.ts"]))
        .expect("analyze");
    assert_eq!(outcome.report.files[0].affected_exports, vec!["add"]);
    assert!(outcome.report.files[0]
        .importers
        .iter()
        .any(|i| i.file == "src/main.ts"));
}

#[test]
fn mutual_import_cycles_terminate_without_truncation() {
    let source: MemoryTextSource = [
        (
            "src/a.ts",
            "import { b } from './b';\nexport const a = b + 1;\n",
        ),
        (
            "src/b.ts",
            "import { a } from './a';\nexport const b = a + 1;\n",
        ),
    ]
    .into_iter()
    .collect();
    let graphs = [
        graph_of("src/a.ts", "import { b } from './b';\nexport const a = b + 1;\n"),
        graph_of("src/b.ts", "import { a } from './a';\nexport const b = a + 1;\n"),
    ];
    let config = RippleConfig::default();
    let resolved = resolve_project(
        graphs.iter(),
        &config,
        &files(&["src/a.ts", "src/b.ts"]),
    );
    let mut cache = GraphCache::new();
    let impact = resolve_transitive(
        vec![("src/a.ts".to_string(), "b".to_string())],
        &resolved,
        &mut cache,
        &source,
        &ImpactOptions::default(),
    )
    .expect("resolve");

    assert!(!impact.truncated, "the visited-edge set breaks the cycle");
    let mut importer_files: Vec<&str> =
        impact.importers.iter().map(|i| i.file.as_str()).collect();
    importer_files.dedup();
    assert_eq!(importer_files, vec!["src/a.ts", "src/b.ts"]);
}

fn chain_sources() -> (MemoryTextSource, Vec<String>) {
    let mut source = MemoryTextSource::new();
    source.insert("src/f0.ts", "export const v0 = 1;\n");
    let mut paths = vec!["src/f0.ts".to_string()];
    for i in 1..=4u32 {
        let text = format!(
            "import {{ v{prev} }} from './f{prev}';\nexport const v{i} = v{prev} + 1;\n",
            prev = i - 1,
        );
        let path = format!("src/f{i}.ts");
        source.insert(path.clone(), text);
        paths.push(path);
    }
    (source, paths)
}

#[test]
fn the_hop_ceiling_truncates_and_says_so() {
    let (source, paths) = chain_sources();
    let project_files: FxHashSet<String> = paths.iter().cloned().collect();
    let graphs: Vec<crate::scope::FileGraph> = paths
        .iter()
        .map(|p| graph_of(p, &source.read(p).expect("read")))
        .collect();
    let config = RippleConfig::default();
    let resolved = resolve_project(graphs.iter(), &config, &project_files);
    let frontier = vec![("src/f1.ts".to_string(), "v0".to_string())];

    let mut cache = GraphCache::new();
    let capped = resolve_transitive(
        frontier.clone(),
        &resolved,
        &mut cache,
        &source,
        &ImpactOptions { max_hops: 1 },
    )
    .expect("resolve");
    assert!(capped.truncated, "one hop cannot drain a four-link chain");

    let mut cache = GraphCache::new();
    let full = resolve_transitive(
        frontier,
        &resolved,
        &mut cache,
        &source,
        &ImpactOptions::default(),
    )
    .expect("resolve");
    assert!(!full.truncated);
    assert!(full
        .impacted
        .iter()
        .any(|e| e.file == "src/f4.ts" && e.export_name == "v4"));
}
