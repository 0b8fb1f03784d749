//! CSV export implementation.
//!
//! Exports unused exports in CSV format for spreadsheet use, one row per
//! symbol.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "file,name,start_line,start_column,end_line,end_column,used_in_module"
        )?;

        for (file, symbol) in data.rows() {
            let span = symbol.symbol.span;
            writeln!(
                writer,
                "{},{},{},{},{},{},{}",
                Self::escape_field(file),
                Self::escape_field(symbol.name()),
                span.start.line,
                span.start.column,
                span.end.line,
                span.end.column,
                symbol.used_in_module
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    #[test]
    fn test_csv_export_basic() {
        let mut output = Vec::new();
        CsvExporter.export(&fixtures::sample(), &mut output).unwrap();

        let csv_str = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = csv_str.lines().collect();

        // Header + 3 symbols
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "file,name,start_line,start_column,end_line,end_column,used_in_module"
        );
        assert_eq!(lines[1], "src/foo.ts,unusedC,8,14,8,21,false");
        assert_eq!(lines[2], "src/foo.ts,UnusedT,9,14,9,21,true");
    }

    #[test]
    fn test_csv_export_empty() {
        let mut output = Vec::new();
        CsvExporter.export(&ExportData::default(), &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_csv_escape_field() {
        assert_eq!(CsvExporter::escape_field("simple"), "simple");
        assert_eq!(
            CsvExporter::escape_field("dir,with,commas/a.ts"),
            "\"dir,with,commas/a.ts\""
        );
        assert_eq!(
            CsvExporter::escape_field("has\"quote"),
            "\"has\"\"quote\""
        );
    }
}
