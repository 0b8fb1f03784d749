//! Plain text export implementation.
//!
//! One line per unused export, in the form `file:line - name`, with a
//! ` (used in module)` suffix for exports the module still references.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Plain text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        for (file, symbol) in data.rows() {
            write!(
                writer,
                "{}:{} - {}",
                file,
                symbol.symbol.span.start.line,
                symbol.name()
            )?;
            if symbol.used_in_module {
                write!(writer, " (used in module)")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}
