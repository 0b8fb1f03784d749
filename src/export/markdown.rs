//! Markdown export implementation.
//!
//! Exports unused exports in Markdown format for documentation and reporting.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl MarkdownExporter {
    /// Escape characters that would break a table cell.
    fn escape_cell(value: &str) -> String {
        value.replace('|', "\\|")
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Unused Exports Report")?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Modules Analyzed | {} |", data.modules_analyzed)?;
        writeln!(
            writer,
            "| Files With Unused Exports | {} |",
            data.file_count()
        )?;
        writeln!(writer, "| Unused Exports | {} |", data.symbol_count())?;
        writeln!(writer, "| Used In Module | {} |", data.used_in_module_count())?;
        writeln!(writer)?;

        if data.entries.is_empty() {
            writeln!(writer, "No unused exports found.")?;
            writeln!(writer)?;
        } else {
            writeln!(writer, "## Unused Exports")?;
            writeln!(writer)?;

            for entry in &data.entries {
                writeln!(
                    writer,
                    "### `{}` ({})",
                    entry.file,
                    entry.symbols.len()
                )?;
                writeln!(writer)?;
                writeln!(writer, "| Export | Line | Column | Used In Module |")?;
                writeln!(writer, "|--------|------|--------|----------------|")?;
                for symbol in &entry.symbols {
                    let start = symbol.symbol.span.start;
                    writeln!(
                        writer,
                        "| {} | {} | {} | {} |",
                        Self::escape_cell(symbol.name()),
                        start.line,
                        start.column,
                        if symbol.used_in_module { "yes" } else { "no" }
                    )?;
                }
                writeln!(writer)?;
            }
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by deadexports*")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    fn render(data: &ExportData) -> String {
        let mut output = Vec::new();
        MarkdownExporter.export(data, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_markdown_export_summary() {
        let md = render(&fixtures::sample());

        assert!(md.starts_with("# Unused Exports Report"));
        assert!(md.contains("| Modules Analyzed | 5 |"));
        assert!(md.contains("| Files With Unused Exports | 2 |"));
        assert!(md.contains("| Unused Exports | 3 |"));
        assert!(md.contains("| Used In Module | 1 |"));
    }

    #[test]
    fn test_markdown_export_tables() {
        let md = render(&fixtures::sample());

        assert!(md.contains("### `src/foo.ts` (2)"));
        assert!(md.contains("| unusedC | 8 | 14 | no |"));
        assert!(md.contains("| UnusedT | 9 | 14 | yes |"));
        assert!(md.contains("### `src/bar.ts` (1)"));
        assert!(md.ends_with("*Generated by deadexports*\n"));
    }

    #[test]
    fn test_markdown_export_empty() {
        let md = render(&ExportData::default());
        assert!(md.contains("No unused exports found."));
        assert!(!md.contains("## Unused Exports\n"));
    }
}
