//! Accumulated analysis results.
//!
//! [`ResultState`] is filled by a single writer, the project analyzer's
//! callback, and read by everything else. Reports are keyed by module path,
//! so a second report for the same module replaces the first; usage evidence
//! only ever grows.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::module::{ModuleReport, ReportedSymbol};
use super::project::{AnalysisEvent, UsageEvidence};

/// Unused exports of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusedExports {
    pub file: String,
    pub symbols: Vec<ReportedSymbol>,
}

/// Accumulator for module reports and usage evidence.
#[derive(Debug, Clone, Default)]
pub struct ResultState {
    reports: BTreeMap<String, ModuleReport>,
    used: HashMap<String, HashSet<String>>,
}

impl ResultState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one analysis event.
    pub fn on_result(&mut self, event: AnalysisEvent) {
        match event {
            AnalysisEvent::Module(report) => self.on_report(report),
            AnalysisEvent::Used(evidence) => self.on_usage(evidence),
        }
    }

    /// Store a module report, replacing any earlier report for the same file.
    pub fn on_report(&mut self, report: ModuleReport) {
        self.reports.insert(report.file.clone(), report);
    }

    pub fn on_usage(&mut self, evidence: UsageEvidence) {
        self.used
            .entry(evidence.file)
            .or_default()
            .extend(evidence.symbols);
    }

    /// Whether `name` exported by `file` has any usage evidence.
    pub fn is_used(&self, file: &str, name: &str) -> bool {
        self.used.get(file).is_some_and(|names| names.contains(name))
    }

    pub fn report(&self, file: &str) -> Option<&ModuleReport> {
        self.reports.get(file)
    }

    /// All stored reports, in path order.
    pub fn reports(&self) -> impl Iterator<Item = &ModuleReport> {
        self.reports.values()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// The report for `file` narrowed to exports without usage evidence.
    ///
    /// The returned report may have no symbols.
    pub fn potentially_unused(&self, file: &str) -> Option<ModuleReport> {
        let report = self.reports.get(file)?;
        Some(ModuleReport {
            symbols: self.unused_symbols(report),
            ..report.clone()
        })
    }

    fn unused_symbols(&self, report: &ModuleReport) -> Vec<ReportedSymbol> {
        report
            .symbols
            .iter()
            .filter(|symbol| !self.is_used(&report.file, symbol.name()))
            .cloned()
            .collect()
    }

    /// Every module with at least one export that nothing uses, in path
    /// order.
    pub fn definitely_unused(&self) -> Vec<UnusedExports> {
        self.reports
            .values()
            .filter_map(|report| {
                let symbols = self.unused_symbols(report);
                (!symbols.is_empty()).then(|| UnusedExports {
                    file: report.file.clone(),
                    symbols,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::project::EvidenceSource;
    use crate::analysis::symbols::{ExportedSymbol, SourcePosition, SourceSpan};

    fn symbol(name: &str, line: usize) -> ReportedSymbol {
        ReportedSymbol {
            symbol: ExportedSymbol::new(
                name,
                SourceSpan::new(SourcePosition::new(line, 1), SourcePosition::new(line, 10)),
            ),
            used_in_module: false,
        }
    }

    fn report(file: &str, names: &[&str]) -> ModuleReport {
        ModuleReport::new(
            file,
            names
                .iter()
                .enumerate()
                .map(|(i, n)| symbol(n, i + 1))
                .collect(),
        )
    }

    fn used(file: &str, names: &[&str]) -> UsageEvidence {
        UsageEvidence {
            file: file.to_string(),
            symbols: names.iter().map(|n| n.to_string()).collect(),
            source: EvidenceSource::Import {
                importer: "/p/consumer.ts".to_string(),
            },
        }
    }

    fn unused_names(state: &ResultState) -> Vec<(String, Vec<String>)> {
        state
            .definitely_unused()
            .into_iter()
            .map(|u| {
                let names = u.symbols.iter().map(|s| s.name().to_string()).collect();
                (u.file, names)
            })
            .collect()
    }

    #[test]
    fn test_definitely_unused_filters_and_omits_empty() {
        let mut state = ResultState::new();
        state.on_result(AnalysisEvent::Module(report("/p/a.ts", &["x", "y"])));
        state.on_result(AnalysisEvent::Module(report("/p/b.ts", &["z"])));
        state.on_result(AnalysisEvent::Used(used("/p/a.ts", &["x"])));
        state.on_result(AnalysisEvent::Used(used("/p/b.ts", &["z"])));

        assert_eq!(
            unused_names(&state),
            vec![("/p/a.ts".to_string(), vec!["y".to_string()])]
        );
        assert!(state.potentially_unused("/p/b.ts").unwrap().symbols.is_empty());
    }

    #[test]
    fn test_report_replacement_is_idempotent() {
        let mut once = ResultState::new();
        once.on_report(report("/p/a.ts", &["second"]));

        let mut twice = ResultState::new();
        twice.on_report(report("/p/a.ts", &["first"]));
        twice.on_report(report("/p/a.ts", &["second"]));

        assert_eq!(twice.len(), 1);
        assert_eq!(unused_names(&once), unused_names(&twice));
    }

    #[test]
    fn test_evidence_order_does_not_matter() {
        let mut early = ResultState::new();
        early.on_usage(used("/p/a.ts", &["x"]));
        early.on_report(report("/p/a.ts", &["x", "y"]));

        let mut late = ResultState::new();
        late.on_report(report("/p/a.ts", &["x", "y"]));
        late.on_usage(used("/p/a.ts", &["x"]));

        assert_eq!(unused_names(&early), unused_names(&late));
    }

    #[test]
    fn test_evidence_is_per_file() {
        let mut state = ResultState::new();
        state.on_report(report("/p/a.ts", &["x"]));
        state.on_usage(used("/p/other.ts", &["x"]));

        assert!(!state.is_used("/p/a.ts", "x"));
        assert_eq!(unused_names(&state).len(), 1);
    }

    #[test]
    fn test_unknown_file() {
        let state = ResultState::new();
        assert!(state.potentially_unused("/p/none.ts").is_none());
        assert!(state.is_empty());
    }
}
