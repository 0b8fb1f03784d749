//! End-to-end run: load the project, analyze it, filter and print the
//! results.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use crate::analysis::{ProjectAnalyzer, UnusedExports};
use crate::config::Config;
use crate::export::{self, ExportData};
use crate::graph::Project;

/// Run against the current working directory.
///
/// Returns the number of reported symbols.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<usize> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    run_in(config, &cwd, out)
}

/// Run with `config.project` resolved against `cwd`; reported paths are
/// made relative to `cwd` where possible.
pub fn run_in<W: Write>(config: &Config, cwd: &Path, out: &mut W) -> Result<usize> {
    let ignore = config.ignore_pattern()?;
    let tsconfig = cwd.join(&config.project);

    let project = Project::load_tsconfig(&tsconfig)
        .with_context(|| format!("Failed to load project from {}", tsconfig.display()))?;

    let state = ProjectAnalyzer::new(&project)
        .with_skip_pattern(config.skip_pattern())
        .run();

    let base = cwd.canonicalize().unwrap_or_else(|_| cwd.to_path_buf());
    let entries = filter_results(
        state.definitely_unused(),
        &base,
        ignore.as_ref(),
        config.unused_in_module,
    );

    let data = ExportData::new(entries, state.len());
    info!(
        "{} unused exports in {} of {} modules",
        data.symbol_count(),
        data.file_count(),
        data.modules_analyzed
    );

    export::export(config.format, &data, out).context("Failed to write report")?;
    Ok(data.symbol_count())
}

/// Relativize paths, then drop ignored files, symbols used in their own
/// module (when `unused_in_module` is set) and entries left empty.
fn filter_results(
    entries: Vec<UnusedExports>,
    base: &Path,
    ignore: Option<&Regex>,
    unused_in_module: bool,
) -> Vec<UnusedExports> {
    entries
        .into_iter()
        .filter_map(|mut entry| {
            entry.file = display_path(&entry.file, base);
            if ignore.is_some_and(|re| re.is_match(&entry.file)) {
                return None;
            }
            if unused_in_module {
                entry.symbols.retain(|s| !s.used_in_module);
            }
            (!entry.symbols.is_empty()).then_some(entry)
        })
        .collect()
}

fn display_path(file: &str, base: &Path) -> String {
    let path = PathBuf::from(file);
    match path.strip_prefix(base) {
        Ok(relative) => relative.to_string_lossy().replace('\\', "/"),
        Err(_) => file.to_string(),
    }
}
