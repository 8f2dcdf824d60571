//! Cross-file export/import resolution.
//!
//! Combines every file's import/export tables with the alias table into the
//! string maps the transitive resolver joins on:
//!
//! - `import_to_export["file#local"] = "resolvedFile#exportedName"` (or just
//!   `"resolvedFile"` for whole-module imports),
//! - `export_to_export["file#exported"] = "resolvedFile#localName"`,
//! - `indirect_export_members["reexporter#member"] = "declaringFile#local"`
//!   for members reachable through `export * from` chains,
//! - `no_match_exports` for member links that resolve to nothing.
//!
//! Keys are `file#member` strings; [`member_key`] and [`split_member_key`]
//! are the only places that build or pick them apart.

use std::path::Path;

use path_clean::clean;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use ripple_config::RippleConfig;

use crate::parse::SourceKind;
use crate::report::{Diagnostic, DiagnosticKind};
use crate::scope::FileGraph;

pub fn member_key(file: &str, member: &str) -> String {
    format!("{file}#{member}")
}

/// `"file#member"` → `(file, Some(member))`; `"file"` → `(file, None)`.
pub fn split_member_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once('#') {
        Some((file, member)) => (file, Some(member)),
        None => (key, None),
    }
}

/// Candidate paths for one specifier, or "external".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecifierResolution {
    /// Probed in order: literal, with each extension, `index.*` inside it.
    pub candidates: Vec<String>,
    pub external: bool,
}

impl SpecifierResolution {
    fn external() -> Self {
        Self {
            candidates: Vec::new(),
            external: true,
        }
    }
}

fn normalize(path: impl AsRef<Path>) -> String {
    clean(path.as_ref()).to_string_lossy().replace('\\', "/")
}

fn probe_candidates(base: &str, extensions: &[String]) -> Vec<String> {
    let mut candidates = Vec::with_capacity(1 + extensions.len() * 2);
    candidates.push(base.to_string());
    for ext in extensions {
        candidates.push(format!("{base}{ext}"));
    }
    for ext in extensions {
        candidates.push(normalize(format!("{base}/index{ext}")));
    }
    candidates
}

/// Resolve one import specifier against the alias table and the importing
/// file's directory. `$`-suffixed alias keys match exactly; otherwise a key
/// matches as a path prefix. When several keys match, the last registered
/// wins. A specifier matching neither a relative path nor an alias is
/// external.
pub fn resolve_specifier(
    config: &RippleConfig,
    specifier: &str,
    importing_file: &str,
) -> SpecifierResolution {
    if specifier.starts_with('.') {
        let dir = Path::new(importing_file)
            .parent()
            .unwrap_or_else(|| Path::new(""));
        let base = normalize(dir.join(specifier));
        return SpecifierResolution {
            candidates: probe_candidates(&base, &config.extensions),
            external: false,
        };
    }

    // Exact ($-suffixed) aliases take priority over prefix aliases; within
    // each class the last registration wins.
    for (key, target) in config.alias.iter().rev() {
        if let Some(exact) = key.strip_suffix('$') {
            if specifier == exact {
                let base = normalize(target);
                return SpecifierResolution {
                    candidates: probe_candidates(&base, &config.extensions),
                    external: false,
                };
            }
        }
    }
    for (key, target) in config.alias.iter().rev() {
        if key.ends_with('$') {
            continue;
        }
        if specifier == key {
            let base = normalize(target);
            return SpecifierResolution {
                candidates: probe_candidates(&base, &config.extensions),
                external: false,
            };
        }
        if let Some(rest) = specifier.strip_prefix(key).and_then(|r| r.strip_prefix('/')) {
            let base = normalize(format!("{target}/{rest}"));
            return SpecifierResolution {
                candidates: probe_candidates(&base, &config.extensions),
                external: false,
            };
        }
    }

    SpecifierResolution::external()
}

/// An export/import member link that resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoMatchExport {
    pub file: String,
    pub member: String,
    /// The unmatched upstream target when the link came from an import.
    pub target_file: Option<String>,
    pub target_member: Option<String>,
}

/// Cross-file symbol maps for one project snapshot.
#[derive(Debug, Default)]
pub struct ResolvedProject {
    pub import_to_export: FxHashMap<String, String>,
    pub export_to_export: FxHashMap<String, String>,
    /// `export * from` sources per re-exporting file.
    pub star_sources: FxHashMap<String, Vec<String>>,
    /// Concrete origin for members exposed through star re-export chains.
    pub indirect_export_members: FxHashMap<String, String>,
    pub no_match_exports: Vec<NoMatchExport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolvedProject {
    /// Every importer `(file, localName)` whose import lands on one of the
    /// given export keys, directly, through a named re-export alias, or
    /// through a star re-export chain.
    pub fn importers_of(&self, export_keys: &FxHashSet<String>) -> Vec<(String, String)> {
        let mut reachable: FxHashSet<&str> = export_keys.iter().map(String::as_str).collect();
        // `export { x } from './y'` aliases chain; expand to a fixed point.
        loop {
            let additions: Vec<&str> = self
                .export_to_export
                .iter()
                .filter(|(key, origin)| {
                    reachable.contains(origin.as_str()) && !reachable.contains(key.as_str())
                })
                .map(|(key, _)| key.as_str())
                .collect();
            if additions.is_empty() {
                break;
            }
            reachable.extend(additions);
        }
        for (indirect_key, origin) in &self.indirect_export_members {
            if reachable.contains(origin.as_str()) {
                reachable.insert(indirect_key.as_str());
            }
        }
        let mut importers: Vec<(String, String)> = self
            .import_to_export
            .iter()
            .filter(|(_, target)| reachable.contains(target.as_str()))
            .filter_map(|(import_key, _)| {
                let (file, member) = split_member_key(import_key);
                member.map(|m| (file.to_string(), m.to_string()))
            })
            .collect();
        importers.sort();
        importers
    }
}

fn resolve_source_path(
    config: &RippleConfig,
    specifier: &str,
    importing_file: &str,
    project_files: &FxHashSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let resolution = resolve_specifier(config, specifier, importing_file);
    if resolution.external {
        return specifier.to_string();
    }
    match resolution
        .candidates
        .iter()
        .find(|candidate| project_files.contains(candidate.as_str()))
    {
        Some(found) => found.clone(),
        None => {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::PathResolutionAmbiguous,
                importing_file,
                format!("specifier {specifier:?} matched no project file; treated as external"),
            ));
            specifier.to_string()
        }
    }
}

/// Build the cross-file maps from every analyzable file's tables.
///
/// Must run strictly after every constituent file's scope graph is complete;
/// the graphs are read-only here.
pub fn resolve_project<'a>(
    graphs: impl IntoIterator<Item = &'a FileGraph>,
    config: &RippleConfig,
    project_files: &FxHashSet<String>,
) -> ResolvedProject {
    let mut resolved = ResolvedProject::default();

    for graph in graphs {
        let file = graph.file_path.as_str();
        if config.is_ignored_path(file) || !SourceKind::from_path(file).is_analyzable() {
            continue;
        }

        for record in &graph.imports {
            let source_path = resolve_source_path(
                config,
                &record.source,
                file,
                project_files,
                &mut resolved.diagnostics,
            );
            for member in &record.members {
                resolved.import_to_export.insert(
                    member_key(file, &member.local),
                    member_key(&source_path, &member.imported),
                );
            }
            if record.members.is_empty() {
                resolved
                    .import_to_export
                    .insert(file.to_string(), source_path.clone());
            }
        }

        for record in &graph.exports {
            let source_path = record.source.as_ref().map(|source| {
                resolve_source_path(
                    config,
                    source,
                    file,
                    project_files,
                    &mut resolved.diagnostics,
                )
            });
            if record.export_all {
                if let Some(source_path) = &source_path {
                    resolved
                        .star_sources
                        .entry(file.to_string())
                        .or_default()
                        .push(source_path.clone());
                }
                continue;
            }
            for member in &record.members {
                let upstream = source_path.as_deref().unwrap_or(file);
                resolved.export_to_export.insert(
                    member_key(file, &member.exported),
                    member_key(upstream, &member.local),
                );
                // An own export whose local never got a program binding is a
                // no-match export, not a silent drop.
                if record.source.is_none()
                    && member.local != "default"
                    && member.local != "*"
                    && graph.program_bindings(&member.local).is_empty()
                {
                    resolved.no_match_exports.push(NoMatchExport {
                        file: file.to_string(),
                        member: member.local.clone(),
                        target_file: None,
                        target_member: None,
                    });
                    resolved.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnresolvedExportMember,
                        file,
                        format!("no-match export: {:?} has no local declaration", member.local),
                    ));
                }
            }
        }
    }

    resolved.indirect_export_members = indirect_members(&resolved);
    collect_import_no_matches(&mut resolved, project_files);
    resolved
}

/// Walk `export * from` chains to a concrete export, guarded by a visited
/// list so mutual re-exports terminate.
fn indirect_members(resolved: &ResolvedProject) -> FxHashMap<String, String> {
    let mut potential: FxHashMap<String, String> = FxHashMap::default();
    for start in resolved.star_sources.keys() {
        let mut visited: Vec<&str> = vec![start.as_str()];
        let mut stack: Vec<&str> = resolved.star_sources[start]
            .iter()
            .map(String::as_str)
            .collect();
        while let Some(source) = stack.pop() {
            if visited.contains(&source) {
                continue;
            }
            visited.push(source);
            for (export_key, origin) in &resolved.export_to_export {
                let (export_file, Some(member)) = split_member_key(export_key) else {
                    continue;
                };
                if export_file == source {
                    potential
                        .entry(member_key(start, member))
                        .or_insert_with(|| origin.clone());
                }
            }
            if let Some(next) = resolved.star_sources.get(source) {
                stack.extend(next.iter().map(String::as_str));
            }
        }
    }
    potential
}

/// Imports whose upstream member exists in the project but is exported by
/// nobody, directly or indirectly.
fn collect_import_no_matches(resolved: &mut ResolvedProject, project_files: &FxHashSet<String>) {
    let mut missing: Vec<NoMatchExport> = Vec::new();
    for (import_key, target) in &resolved.import_to_export {
        let (target_file, Some(target_member)) = split_member_key(target) else {
            continue;
        };
        if target_member == "*" || !project_files.contains(target_file) {
            continue;
        }
        if resolved.export_to_export.contains_key(target)
            || resolved.indirect_export_members.contains_key(target)
        {
            continue;
        }
        let (file, member) = split_member_key(import_key);
        missing.push(NoMatchExport {
            file: file.to_string(),
            member: member.unwrap_or("").to_string(),
            target_file: Some(target_file.to_string()),
            target_member: Some(target_member.to_string()),
        });
    }
    missing.sort_by(|a, b| (&a.file, &a.member).cmp(&(&b.file, &b.member)));
    for entry in &missing {
        resolved.diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnresolvedExportMember,
            entry.file.clone(),
            format!(
                "no-match export: {}#{} imports {:?} which {} does not export",
                entry.file,
                entry.member,
                entry.target_member.as_deref().unwrap_or(""),
                entry.target_file.as_deref().unwrap_or(""),
            ),
        ));
    }
    resolved.no_match_exports.extend(missing);
}
