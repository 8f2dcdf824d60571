//! Module-dependency-graph boundary.
//!
//! The forward import graph is built by an external tool; ripple only
//! consumes it. `dependants` is the reverse query the transitive resolver
//! fans out through.

use rustc_hash::FxHashMap;

/// Forward (`dependencies`) and reverse (`dependants`) module-graph lookups.
pub trait ModuleGraphProvider {
    /// Files that `file` imports.
    fn dependencies(&self, file: &str) -> Vec<String>;

    /// Files that import `file`.
    fn dependants(&self, file: &str) -> Vec<String>;
}

/// In-memory adapter over a `file -> imports[]` map.
#[derive(Debug, Clone, Default)]
pub struct MemoryModuleGraph {
    tree: FxHashMap<String, Vec<String>>,
}

impl MemoryModuleGraph {
    pub fn new(tree: FxHashMap<String, Vec<String>>) -> Self {
        Self { tree }
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.tree.keys().map(String::as_str)
    }
}

impl<P: Into<String>, D: Into<String>> FromIterator<(P, Vec<D>)> for MemoryModuleGraph {
    fn from_iter<I: IntoIterator<Item = (P, Vec<D>)>>(iter: I) -> Self {
        let tree = iter
            .into_iter()
            .map(|(file, deps)| (file.into(), deps.into_iter().map(Into::into).collect()))
            .collect();
        Self { tree }
    }
}

impl ModuleGraphProvider for MemoryModuleGraph {
    fn dependencies(&self, file: &str) -> Vec<String> {
        self.tree.get(file).cloned().unwrap_or_default()
    }

    fn dependants(&self, file: &str) -> Vec<String> {
        self.tree
            .iter()
            .filter(|(_, deps)| deps.iter().any(|d| d == file))
            .map(|(dependant, _)| dependant.clone())
            .collect()
    }
}

/// Changed files plus everything that transitively imports them, bounded by
/// `max_hops` reverse steps. The result always contains the seeds.
pub fn collect_upstream_files(
    provider: &dyn ModuleGraphProvider,
    changed: &[String],
    max_hops: u32,
) -> Vec<String> {
    let mut collected: Vec<String> = changed.to_vec();
    let mut frontier: Vec<String> = changed.to_vec();
    for _ in 0..max_hops {
        let next: Vec<String> = frontier
            .iter()
            .flat_map(|file| provider.dependants(file))
            .filter(|file| !collected.contains(file))
            .collect();
        if next.is_empty() {
            break;
        }
        collected.extend(next.iter().cloned());
        frontier = next;
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> MemoryModuleGraph {
        [
            ("src/main.ts", vec!["src/util.ts", "src/api.ts"]),
            ("src/api.ts", vec!["src/util.ts"]),
            ("src/util.ts", vec![]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn dependants_is_reverse_of_dependencies() {
        let graph = graph();
        let mut dependants = graph.dependants("src/util.ts");
        dependants.sort();
        assert_eq!(dependants, vec!["src/api.ts", "src/main.ts"]);
        assert!(graph.dependants("src/main.ts").is_empty());
    }

    #[test]
    fn upstream_collection_is_bounded_and_deduped() {
        let graph = graph();
        let upstream =
            collect_upstream_files(&graph, &["src/util.ts".to_string()], 9);
        assert_eq!(upstream.len(), 3);
        assert!(upstream.contains(&"src/main.ts".to_string()));

        let only_seed = collect_upstream_files(&graph, &["src/util.ts".to_string()], 0);
        assert_eq!(only_seed, vec!["src/util.ts".to_string()]);
    }
}
