//! Plain text export implementation.
//!
//! Writes one line per record for console consumption, in lockfile order,
//! followed by a classification summary.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Plain text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "{}: {} dependencies",
            data.lockfile,
            data.records.len()
        )?;

        for record in &data.records {
            write!(
                writer,
                "  {}@{} [{}]",
                record.package, record.version, record.transitivity
            )?;
            if let Some(url) = &record.resolved_url {
                write!(writer, " {}", url)?;
            }
            writeln!(writer, " (line {})", record.line_number)?;
        }

        writeln!(
            writer,
            "direct: {}, transitive: {}, unknown: {}",
            data.direct_count(),
            data.transitive_count(),
            data.unknown_count()
        )
    }
}
