//! Per-module analysis.
//!
//! Combines export extraction with the module's own usage record. Nothing
//! here looks at other modules: `used_in_module` only says whether an export
//! is also referenced by its declaring module.

use serde::{Serialize, Serializer};

use super::symbols::{extract_exports, ExportedSymbol};
use super::usage::{resolve_module_usage, UsageRecord};
use crate::parser::SourceModule;

/// Kind of a module report.
///
/// Only one kind exists today; it serializes as the number `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ReportKind {
    /// Exports of the module, before cross-module usage is applied.
    #[default]
    PotentiallyUnused = 0,
}

impl Serialize for ReportKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// An exported symbol plus its self-use flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedSymbol {
    #[serde(flatten)]
    pub symbol: ExportedSymbol,
    pub used_in_module: bool,
}

impl ReportedSymbol {
    pub fn name(&self) -> &str {
        &self.symbol.name
    }
}

/// The exports of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    pub file: String,
    pub symbols: Vec<ReportedSymbol>,
    #[serde(rename = "type")]
    pub kind: ReportKind,
}

impl ModuleReport {
    pub fn new(file: impl Into<String>, symbols: Vec<ReportedSymbol>) -> Self {
        Self {
            file: file.into(),
            symbols,
            kind: ReportKind::PotentiallyUnused,
        }
    }

    /// Names of the reported symbols, in source order.
    pub fn names(&self) -> Vec<&str> {
        self.symbols.iter().map(ReportedSymbol::name).collect()
    }
}

/// Analyze one module in isolation.
pub fn analyze_module(module: &SourceModule) -> ModuleReport {
    module_report(module, &resolve_module_usage(module))
}

/// Build the report for `module` from its already resolved usage.
pub(crate) fn module_report(module: &SourceModule, usage: &UsageRecord) -> ModuleReport {
    let symbols = extract_exports(module)
        .into_iter()
        .map(|symbol| ReportedSymbol {
            used_in_module: usage.is_referenced(&symbol.name),
            symbol,
        })
        .collect();

    ModuleReport::new(module.path(), symbols)
}
