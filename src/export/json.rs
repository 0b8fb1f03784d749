//! JSON export implementation.
//!
//! Exports unused exports in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use crate::analysis::SourcePosition;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable unused symbol for JSON output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSymbol<'a> {
    name: &'a str,
    start: SourcePosition,
    end: SourcePosition,
    used_in_module: bool,
}

/// Serializable module entry for JSON output.
#[derive(Serialize)]
struct JsonFile<'a> {
    file: &'a str,
    symbols: Vec<JsonSymbol<'a>>,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    modules_analyzed: usize,
    files_with_unused_exports: usize,
    unused_exports: usize,
    used_in_module: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    summary: JsonSummary,
    unused: Vec<JsonFile<'a>>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let unused = data
            .entries
            .iter()
            .map(|entry| JsonFile {
                file: &entry.file,
                symbols: entry
                    .symbols
                    .iter()
                    .map(|s| JsonSymbol {
                        name: s.name(),
                        start: s.symbol.span.start,
                        end: s.symbol.span.end,
                        used_in_module: s.used_in_module,
                    })
                    .collect(),
            })
            .collect();

        let export = JsonExport {
            summary: JsonSummary {
                modules_analyzed: data.modules_analyzed,
                files_with_unused_exports: data.file_count(),
                unused_exports: data.symbol_count(),
                used_in_module: data.used_in_module_count(),
            },
            unused,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
