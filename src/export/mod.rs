//! Export functionality for extracted dependency records.
//!
//! This module provides order-preserving formatters for the parser's
//! output: JSON for machine consumption and plain text for the console.

pub mod json;
pub mod text;

use crate::parser::{DependencyRecord, Transitivity};
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// Plain text format - console-friendly
    Text,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, text",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Text => write!(f, "text"),
        }
    }
}

/// Data container for export operations.
///
/// Holds the extraction results, with records kept in lockfile order.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Lockfile the records were extracted from
    pub lockfile: String,
    /// Extracted records, in file order
    pub records: Vec<DependencyRecord>,
}

impl ExportData {
    /// Create new export data from extraction results.
    pub fn new(lockfile: String, records: Vec<DependencyRecord>) -> Self {
        Self { lockfile, records }
    }

    /// Get count of direct dependencies
    pub fn direct_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.transitivity == Transitivity::Direct)
            .count()
    }

    /// Get count of transitive dependencies
    pub fn transitive_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.transitivity == Transitivity::Transitive)
            .count()
    }

    /// Get count of records with no classification
    pub fn unknown_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.transitivity == Transitivity::Unknown)
            .count()
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
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Text => text::TextExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Ecosystem;
    use std::collections::BTreeMap;

    fn record(package: &str, transitivity: Transitivity) -> DependencyRecord {
        DependencyRecord {
            package: package.to_string(),
            version: "1.0.0".to_string(),
            ecosystem: Ecosystem::Npm,
            allowed_hashes: BTreeMap::new(),
            resolved_url: None,
            transitivity,
            line_number: 5,
        }
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("invalid".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Text), "text");
    }

    #[test]
    fn test_export_data_counts() {
        let data = ExportData::new(
            "yarn.lock".to_string(),
            vec![
                record("a", Transitivity::Direct),
                record("b", Transitivity::Transitive),
                record("c", Transitivity::Transitive),
                record("d", Transitivity::Unknown),
            ],
        );
        assert_eq!(data.direct_count(), 1);
        assert_eq!(data.transitive_count(), 2);
        assert_eq!(data.unknown_count(), 1);
    }
}
