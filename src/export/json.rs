//! JSON export implementation.
//!
//! Exports extracted dependency records in JSON format for machine-readable
//! output, preserving lockfile order.

use super::{ExportData, Exporter};
use crate::parser::DependencyRecord;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    total_dependencies: usize,
    direct: usize,
    transitive: usize,
    unknown: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    lockfile: &'a str,
    summary: JsonSummary,
    dependencies: &'a [DependencyRecord],
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let export = JsonExport {
            lockfile: &data.lockfile,
            summary: JsonSummary {
                total_dependencies: data.records.len(),
                direct: data.direct_count(),
                transitive: data.transitive_count(),
                unknown: data.unknown_count(),
            },
            dependencies: &data.records,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
