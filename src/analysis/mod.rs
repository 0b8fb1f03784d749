//! Dead export analysis for JavaScript/TypeScript projects.
//!
//! This module finds exported symbols that no other module in the project
//! uses.
//!
//! # Features
//!
//! - Extract named exports with precise source spans
//! - Track which local names a module references itself
//! - Resolve namespace imports (`import * as ns`) down to the members used
//! - Aggregate usage across the whole project, optionally excluding modules
//!   (tests, stories, ...) from counting as consumers
//!
//! # Example
//!
//! ```
//! use deadexports::analysis::ProjectAnalyzer;
//! use deadexports::graph::Project;
//!
//! let project = Project::from_sources([
//!     ("/p/lib.ts", "export const used = 1;\nexport const unused = 2;\n"),
//!     ("/p/app.ts", "import * as lib from './lib';\nconsole.log(lib.used);\n"),
//! ]).unwrap();
//!
//! let state = ProjectAnalyzer::new(&project).run();
//! let unused = state.definitely_unused();
//!
//! assert_eq!(unused.len(), 1);
//! assert_eq!(unused[0].file, "/p/lib.ts");
//! assert_eq!(unused[0].symbols[0].name(), "unused");
//! ```

pub mod module;
pub mod project;
pub mod state;
pub mod symbols;
pub mod usage;

// Re-export main types for convenience
pub use module::{analyze_module, ModuleReport, ReportKind, ReportedSymbol};
pub use project::{
    analyze, compile_skip_pattern, AnalysisEvent, EvidenceSource, ProjectAnalyzer, UsageEvidence,
};
pub use state::{ResultState, UnusedExports};
pub use symbols::{extract_exports, ExportedSymbol, SourcePosition, SourceSpan};
pub use usage::{
    import_bindings, imports_for_side_effects, resolve_module_usage, track_alias_uses,
    track_namespace_uses, ImportBinding, NamespaceAccess, NamespaceUsage, UsageRecord,
};
