//! Project-wide analysis.
//!
//! Runs in two phases over every module of a [`Project`]:
//!
//! 1. every module's exports are reported ([`AnalysisEvent::Module`]);
//! 2. every module's imports are turned into usage evidence for the modules
//!    they point at ([`AnalysisEvent::Used`]).
//!
//! Evidence is a plain set union, so the final verdict does not depend on
//! the order modules are visited in. Modules whose path matches the skip
//! pattern still get their exports reported but contribute no evidence.

use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use super::module::{module_report, ModuleReport};
use super::state::ResultState;
use super::symbols::extract_exports;
use super::usage::{resolve_module_usage, ImportBinding, UsageRecord};
use crate::graph::{normalize_path, Project};
use crate::parser::SourceModule;

/// Why a set of symbols counts as used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceSource {
    /// Imported by another module.
    Import { importer: String },
    /// Exported from an entrypoint, i.e. part of the project's public surface.
    Entrypoint,
}

/// Symbols of `file` that are known to be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageEvidence {
    pub file: String,
    pub symbols: Vec<String>,
    pub source: EvidenceSource,
}

/// What the analyzer hands to its result callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    Module(ModuleReport),
    Used(UsageEvidence),
}

/// Compile a skip pattern. An invalid pattern is logged and treated as
/// "skip nothing".
pub fn compile_skip_pattern(pattern: Option<&str>) -> Option<Regex> {
    let pattern = pattern?;
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!("Ignoring invalid skip pattern {:?}: {}", pattern, e);
            None
        }
    }
}

/// Analyzer over a whole project.
pub struct ProjectAnalyzer<'p> {
    project: &'p Project,
    entrypoints: Vec<String>,
    skip: Option<Regex>,
}

impl<'p> ProjectAnalyzer<'p> {
    /// Create an analyzer using the project's own entrypoints and no skip
    /// pattern.
    pub fn new(project: &'p Project) -> Self {
        Self {
            project,
            entrypoints: project.entrypoints().to_vec(),
            skip: None,
        }
    }

    /// Replace the entrypoints.
    pub fn with_entrypoints<P: AsRef<Path>>(mut self, entrypoints: impl IntoIterator<Item = P>) -> Self {
        self.entrypoints = entrypoints
            .into_iter()
            .map(|p| normalize_path(p.as_ref()))
            .collect();
        self
    }

    /// Exclude modules whose path matches `skip` from contributing evidence.
    pub fn with_skip_pattern(mut self, skip: Option<Regex>) -> Self {
        self.skip = skip;
        self
    }

    pub fn is_skipped(&self, path: &str) -> bool {
        self.skip.as_ref().is_some_and(|re| re.is_match(path))
    }

    fn is_entrypoint(&self, path: &str) -> bool {
        self.entrypoints.iter().any(|e| e == path)
    }

    /// Modules reachable from the entrypoints first (breadth-first), then the
    /// rest of the project in path order.
    pub fn visit_order(&self) -> Vec<&'p SourceModule> {
        let project = self.project;
        let graph = project.module_graph();
        let reachable = graph.reachable_from(&self.entrypoints);

        let mut order: Vec<&'p SourceModule> =
            reachable.iter().filter_map(|path| project.get(path)).collect();
        order.extend(project.modules().filter(|m| !reachable.contains(&m.path())));
        order
    }

    /// Usage evidence contributed by `module`'s imports, given its resolved
    /// `usage`.
    ///
    /// Empty when the module matches the skip pattern.
    pub fn usage_evidence(&self, module: &SourceModule, usage: &UsageRecord) -> Vec<UsageEvidence> {
        if self.is_skipped(module.path()) {
            debug!("Skipping usage evidence from {}", module.path());
            return Vec::new();
        }

        let mut evidence = Vec::new();

        for binding in &usage.bindings {
            let Some(target) = self.project.resolve_import(module.path(), binding.source()) else {
                continue;
            };
            if target == module.path() {
                continue;
            }

            let names = match binding {
                ImportBinding::Named { original, .. } => vec![original.clone()],
                ImportBinding::Default { .. } => vec!["default".to_string()],
                ImportBinding::Namespace { alias, .. } => usage
                    .namespaces
                    .iter()
                    .find(|ns| &ns.alias == alias)
                    .map(|ns| ns.members.clone())
                    .unwrap_or_default(),
                ImportBinding::SideEffect { .. } => Vec::new(),
            };
            add_evidence(&mut evidence, target, names, module.path());
        }

        evidence
    }

    /// Run the analysis, streaming results to `on_result`.
    pub fn analyze(&self, mut on_result: impl FnMut(AnalysisEvent)) {
        let order = self.visit_order();
        debug!(
            "Analyzing {} modules from {} entrypoints",
            order.len(),
            self.entrypoints.len()
        );

        let usages: Vec<UsageRecord> = order.iter().map(|m| resolve_module_usage(m)).collect();

        for (module, usage) in order.iter().zip(&usages) {
            let report = module_report(module, usage);
            debug!("{}: {} exports", report.file, report.symbols.len());
            on_result(AnalysisEvent::Module(report));
        }

        for (module, usage) in order.iter().zip(&usages) {
            if self.is_entrypoint(module.path()) {
                let symbols = extract_exports(module).into_iter().map(|s| s.name).collect();
                on_result(AnalysisEvent::Used(UsageEvidence {
                    file: module.path().to_string(),
                    symbols,
                    source: EvidenceSource::Entrypoint,
                }));
            }

            for evidence in self.usage_evidence(module, usage) {
                debug!(
                    "{} uses {:?} from {}",
                    module.path(),
                    evidence.symbols,
                    evidence.file
                );
                on_result(AnalysisEvent::Used(evidence));
            }
        }
    }

    /// Run the analysis into a fresh [`ResultState`].
    pub fn run(&self) -> ResultState {
        let mut state = ResultState::new();
        self.analyze(|event| state.on_result(event));
        state
    }
}

fn add_evidence(evidence: &mut Vec<UsageEvidence>, file: String, names: Vec<String>, importer: &str) {
    if names.is_empty() {
        return;
    }
    let idx = match evidence.iter().position(|e| e.file == file) {
        Some(idx) => idx,
        None => {
            evidence.push(UsageEvidence {
                file,
                symbols: Vec::new(),
                source: EvidenceSource::Import {
                    importer: importer.to_string(),
                },
            });
            evidence.len() - 1
        }
    };
    let entry = &mut evidence[idx];
    for name in names {
        if !entry.symbols.contains(&name) {
            entry.symbols.push(name);
        }
    }
}

/// Analyze `project`, streaming results to `on_result`.
///
/// Convenience wrapper over [`ProjectAnalyzer`].
pub fn analyze(
    project: &Project,
    on_result: impl FnMut(AnalysisEvent),
    entrypoints: &[String],
    skip: Option<Regex>,
) {
    ProjectAnalyzer::new(project)
        .with_entrypoints(entrypoints)
        .with_skip_pattern(skip)
        .analyze(on_result);
}
