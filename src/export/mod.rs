//! Export functionality for dead export analysis results.
//!
//! This module provides exporters for outputting unused exports in
//! various formats: plain text, JSON, CSV, and Markdown.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod text;

use crate::analysis::{ReportedSymbol, UnusedExports};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Plain text, one `file:line - name` per symbol
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - spreadsheet-friendly
    Csv,
    /// Markdown format - documentation/reporting
    #[serde(alias = "md")]
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Data container for export operations.
///
/// Holds the unused exports of every module that has any.
#[derive(Debug, Clone, Default)]
pub struct ExportData {
    /// Unused exports, one entry per module
    pub entries: Vec<UnusedExports>,
    /// Number of modules that were analyzed
    pub modules_analyzed: usize,
}

impl ExportData {
    /// Create new export data from analysis results.
    pub fn new(entries: Vec<UnusedExports>, modules_analyzed: usize) -> Self {
        Self {
            entries,
            modules_analyzed,
        }
    }

    /// Total number of unused symbols across all modules.
    pub fn symbol_count(&self) -> usize {
        self.entries.iter().map(|e| e.symbols.len()).sum()
    }

    /// Number of modules with at least one unused export.
    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of unused symbols that are still referenced in their own module.
    pub fn used_in_module_count(&self) -> usize {
        self.rows().filter(|(_, s)| s.used_in_module).count()
    }

    /// Flattened `(file, symbol)` pairs, in report order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &ReportedSymbol)> {
        self.entries
            .iter()
            .flat_map(|e| e.symbols.iter().map(move |s| (e.file.as_str(), s)))
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Text => text::TextExporter.export(data, writer),
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::ExportData;
    use crate::analysis::{ExportedSymbol, ReportedSymbol, SourcePosition, SourceSpan, UnusedExports};

    pub fn symbol(name: &str, line: usize, used_in_module: bool) -> ReportedSymbol {
        ReportedSymbol {
            symbol: ExportedSymbol::new(
                name,
                SourceSpan::new(SourcePosition::new(line, 14), SourcePosition::new(line, 21)),
            ),
            used_in_module,
        }
    }

    pub fn sample() -> ExportData {
        ExportData::new(
            vec![
                UnusedExports {
                    file: "src/foo.ts".to_string(),
                    symbols: vec![symbol("unusedC", 8, false), symbol("UnusedT", 9, true)],
                },
                UnusedExports {
                    file: "src/bar.ts".to_string(),
                    symbols: vec![symbol("bar", 2, false)],
                },
            ],
            5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "md".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert!("invalid".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Text), "text");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_export_data_counts() {
        let data = fixtures::sample();
        assert_eq!(data.symbol_count(), 3);
        assert_eq!(data.file_count(), 2);
        assert_eq!(data.used_in_module_count(), 1);

        let rows: Vec<_> = data.rows().map(|(f, s)| (f, s.name())).collect();
        assert_eq!(
            rows,
            vec![
                ("src/foo.ts", "unusedC"),
                ("src/foo.ts", "UnusedT"),
                ("src/bar.ts", "bar")
            ]
        );
    }
}
