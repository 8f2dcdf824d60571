//! Result and diagnostic structures handed to the report assembler.
//!
//! Rendering (Markdown, JSON files, dependency diagrams) lives outside this
//! crate; everything here is plain serializable data.

use serde::{Deserialize, Serialize};

/// Non-fatal data-quality findings accumulated during a run.
///
/// Every kind here degrades locally: the run always returns a best-effort
/// report plus this list, it never raises for data-quality issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Malformed source; the file is excluded from the graph.
    ParseFailure,
    /// A reference with no scope binding that is not on the global allow-list.
    UnresolvedReference,
    /// An export specifier naming a local that does not exist.
    UnresolvedExportMember,
    /// The transitive resolver hit its hop ceiling with a non-empty frontier.
    ResolutionTruncated,
    /// A specifier matched no alias or relative file; treated as external.
    PathResolutionAmbiguous,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub file: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            file: file.into(),
            message: message.into(),
        }
    }
}

/// How the diff touched a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileChangeKind {
    Added,
    Modified,
    Deleted,
}

/// One import edge on the causal chain of an impacted entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContributingImport {
    pub from_file: String,
    pub local_name: String,
}

/// A downstream file reached through the module graph, with the local import
/// name it was reached through and the imports that carried the impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImporterImpact {
    pub file: String,
    pub local_name: String,
    pub contributing_imports: Vec<ContributingImport>,
}

/// An exported member of a downstream file that the change reaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactedExport {
    pub file: String,
    pub export_name: String,
    pub contributing_imports: Vec<ContributingImport>,
}

/// Per changed file: its own affected exports plus everything downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileImpact {
    pub file: String,
    pub change_kind: FileChangeKind,
    /// Exported members of this file whose definitions the diff touches.
    pub affected_exports: Vec<String>,
    /// Importing `(file, localName)` pairs reached directly or transitively.
    pub importers: Vec<ImporterImpact>,
    /// Exported members of downstream files the change propagates into.
    pub downstream_exports: Vec<ImpactedExport>,
}

/// The run result: best-effort impact per changed file plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub files: Vec<FileImpact>,
    /// True when any transitive resolution stopped at the hop ceiling; the
    /// report is then a documented lower bound, not an error.
    pub truncated: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ImpactReport {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_json() {
        let report = ImpactReport {
            files: vec![FileImpact {
                file: "src/util.ts".to_string(),
                change_kind: FileChangeKind::Modified,
                affected_exports: vec!["add".to_string()],
                importers: vec![ImporterImpact {
                    file: "src/main.ts".to_string(),
                    local_name: "add".to_string(),
                    contributing_imports: vec![ContributingImport {
                        from_file: "src/util.ts".to_string(),
                        local_name: "add".to_string(),
                    }],
                }],
                downstream_exports: vec![],
            }],
            truncated: false,
            diagnostics: vec![Diagnostic::new(
                DiagnosticKind::UnresolvedReference,
                "src/util.ts",
                "unknown identifier",
            )],
        };
        let json = serde_json::to_string(&report).expect("serialize");
        let back: ImpactReport = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, report);
    }
}
