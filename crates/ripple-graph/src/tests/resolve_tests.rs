use rustc_hash::FxHashSet;

use ripple_config::RippleConfig;

use super::graph_of;
use crate::resolve::{resolve_project, resolve_specifier};
use crate::scope::FileGraph;

fn files(paths: &[&str]) -> FxHashSet<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

#[test]
fn relative_specifiers_probe_extensions_and_index() {
    let config = RippleConfig::default();
    let resolution = resolve_specifier(&config, "./util", "src/main.ts");
    assert!(!resolution.external);
    assert!(resolution.candidates.contains(&"src/util".to_string()));
    assert!(resolution.candidates.contains(&"src/util.ts".to_string()));
    assert!(resolution.candidates.contains(&"src/util/index.ts".to_string()));

    let parent = resolve_specifier(&config, "../shared/api", "src/pages/home.ts");
    assert!(parent.candidates.contains(&"src/shared/api.ts".to_string()));
}

#[test]
fn alias_matching_is_prefix_or_exact() {
    let mut config = RippleConfig::default();
    config.register_alias("@", "src");
    config.register_alias("dva$", "src/dva-shim");

    let aliased = resolve_specifier(&config, "@/components/Button", "src/main.ts");
    assert!(aliased
        .candidates
        .contains(&"src/components/Button.tsx".to_string()));

    let exact = resolve_specifier(&config, "dva", "src/main.ts");
    assert!(exact.candidates.contains(&"src/dva-shim.ts".to_string()));

    // `$` keys never match as prefixes.
    let not_prefix = resolve_specifier(&config, "dva/router", "src/main.ts");
    assert!(not_prefix.external);
}

#[test]
fn alias_collisions_resolve_last_registered_wins() {
    let mut config = RippleConfig::default();
    config.register_alias("@", "src");
    config.register_alias("@", "app");
    let resolution = resolve_specifier(&config, "@/x", "src/main.ts");
    assert!(resolution.candidates.contains(&"app/x.ts".to_string()));
    assert!(!resolution.candidates.iter().any(|c| c.starts_with("src/")));
}

#[test]
fn bare_specifiers_are_external() {
    let config = RippleConfig::default();
    assert!(resolve_specifier(&config, "react", "src/main.ts").external);
}

#[test]
fn import_and_export_maps_join_on_member_keys() {
    let util = graph_of(
        "src/util.ts",
        "export function add(a, b) {\n  return a + b;\n}\n",
    );
    let main = graph_of(
        "src/main.ts",
        "import { add } from './util';\nadd(1, 2);\n",
    );
    let config = RippleConfig::default();
    let resolved = resolve_project(
        [&util, &main],
        &config,
        &files(&["src/util.ts", "src/main.ts"]),
    );

    assert_eq!(
        resolved.import_to_export.get("src/main.ts#add"),
        Some(&"src/util.ts#add".to_string())
    );
    assert_eq!(
        resolved.export_to_export.get("src/util.ts#add"),
        Some(&"src/util.ts#add".to_string())
    );
    assert!(resolved.no_match_exports.is_empty());
}

#[test]
fn whole_module_imports_map_file_to_file() {
    let side = graph_of("src/side.ts", "console.log('boot');\n");
    let main = graph_of("src/main.ts", "import './side';\n");
    let config = RippleConfig::default();
    let resolved = resolve_project(
        [&side, &main],
        &config,
        &files(&["src/side.ts", "src/main.ts"]),
    );
    assert_eq!(
        resolved.import_to_export.get("src/main.ts"),
        Some(&"src/side.ts".to_string())
    );
}

#[test]
fn star_re_exports_resolve_to_their_declaring_file() {
    let a = graph_of("src/a.ts", "export const X = 1;\n");
    let b = graph_of("src/b.ts", "export * from './a';\n");
    let c = graph_of("src/c.ts", "import { X } from './b';\nexport const Y = X;\n");
    let config = RippleConfig::default();
    let resolved = resolve_project(
        [&a, &b, &c],
        &config,
        &files(&["src/a.ts", "src/b.ts", "src/c.ts"]),
    );

    assert_eq!(
        resolved.indirect_export_members.get("src/b.ts#X"),
        Some(&"src/a.ts#X".to_string())
    );

    // Importers of a.ts#X are found through the chain.
    let importers =
        resolved.importers_of(&["src/a.ts#X".to_string()].into_iter().collect());
    assert_eq!(importers, vec![("src/c.ts".to_string(), "X".to_string())]);
}

#[test]
fn star_re_export_chains_reach_the_origin() {
    let a = graph_of("src/a.ts", "export const X = 1;\n");
    let b = graph_of("src/b.ts", "export * from './a';\n");
    let c = graph_of("src/c.ts", "export * from './b';\n");
    let config = RippleConfig::default();
    let resolved = resolve_project(
        [&a, &b, &c],
        &config,
        &files(&["src/a.ts", "src/b.ts", "src/c.ts"]),
    );
    assert_eq!(
        resolved.indirect_export_members.get("src/c.ts#X"),
        Some(&"src/a.ts#X".to_string())
    );
}

#[test]
fn mutual_star_re_exports_terminate() {
    let a = graph_of("src/a.ts", "export * from './b';\n");
    let b = graph_of("src/b.ts", "export * from './a';\n");
    let config = RippleConfig::default();
    let resolved = resolve_project([&a, &b], &config, &files(&["src/a.ts", "src/b.ts"]));
    assert!(resolved.indirect_export_members.is_empty());
}

#[test]
fn missing_upstream_members_become_no_match_exports() {
    let util = graph_of("src/util.ts", "export const present = 1;\n");
    let main = graph_of("src/main.ts", "import { missing } from './util';\n");
    let config = RippleConfig::default();
    let resolved = resolve_project(
        [&util, &main],
        &config,
        &files(&["src/util.ts", "src/main.ts"]),
    );
    assert_eq!(resolved.no_match_exports.len(), 1);
    let entry = &resolved.no_match_exports[0];
    assert_eq!(entry.file, "src/main.ts");
    assert_eq!(entry.member, "missing");
    assert_eq!(entry.target_file.as_deref(), Some("src/util.ts"));
}

#[test]
fn undeclared_export_locals_are_reported() {
    let graph: FileGraph = graph_of("src/odd.ts", "export { ghost };\n");
    let config = RippleConfig::default();
    let resolved = resolve_project([&graph], &config, &files(&["src/odd.ts"]));
    assert!(resolved
        .no_match_exports
        .iter()
        .any(|e| e.file == "src/odd.ts" && e.member == "ghost"));
}

#[test]
fn declaration_files_are_skipped() {
    let dts = graph_of("src/types.d.ts", "export interface T {}\n");
    let config = RippleConfig::default();
    let resolved = resolve_project([&dts], &config, &files(&["src/types.d.ts"]));
    assert!(resolved.export_to_export.is_empty());
}
