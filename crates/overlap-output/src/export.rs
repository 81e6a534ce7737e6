//! Export of overlap reports as text, JSON or CSV.

use crate::report::OverlapReport;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Human readable listing.
    #[default]
    Text,

    /// Pretty-printed JSON of the whole report.
    Json,

    /// One CSV row per overlapping symbol.
    Csv,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// CSV header, written even when the report has no entries.
const CSV_HEADER: [&str; 3] = ["symbol", "count", "indices"];

/// CSV row layout; indices are `;`-joined so the row stays flat.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    symbol: &'a str,
    count: usize,
    indices: String,
}

/// Write `report` to `writer` in `format`.
pub fn write_report<W: Write>(
    report: &OverlapReport,
    format: ExportFormat,
    mut writer: W,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Text => {
            writer.write_all(report.to_text().as_bytes())?;
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writeln!(writer)?;
        }
        ExportFormat::Csv => {
            let mut csv_writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut writer);
            csv_writer.write_record(CSV_HEADER)?;
            for entry in &report.entries {
                csv_writer.serialize(CsvRow {
                    symbol: &entry.symbol,
                    count: entry.count,
                    indices: entry.joined_indices(";"),
                })?;
            }
            csv_writer.flush()?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write `report` to the file at `path` in `format`.
pub fn export_to_file(
    report: &OverlapReport,
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_report(report, format, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlap_index::{IndexName, aggregate};
    use rstest::rstest;

    fn report() -> OverlapReport {
        let map = aggregate(vec![
            (IndexName::from("50"), vec!["TCS".to_string(), "INFY".to_string()]),
            (IndexName::from("it"), vec!["TCS".to_string(), "INFY".to_string()]),
            (IndexName::from("200alpha30"), vec!["TCS".to_string()]),
        ]);
        OverlapReport::new(&map)
    }

    #[rstest]
    #[case("JSON", ExportFormat::Json)]
    #[case("csv", ExportFormat::Csv)]
    #[case("txt", ExportFormat::Text)]
    #[case("Text", ExportFormat::Text)]
    fn test_format_parsing(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
        assert_eq!(ExportFormat::Csv.extension(), "csv");
    }

    #[test]
    fn test_csv_export() {
        let mut buf = Vec::new();
        write_report(&report(), ExportFormat::Csv, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "symbol,count,indices\nTCS,3,50;it;200alpha30\nINFY,2,50;it\n"
        );
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        write_report(&report(), ExportFormat::Json, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["entries"][0]["symbol"], "TCS");
        assert_eq!(value["entries"][0]["count"], 3);
        assert_eq!(value["entries"][1]["indices"][1], "it");
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join("overlap_export_test.txt");
        export_to_file(&report(), ExportFormat::Text, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("TCS: present in 3 portfolios within [50,it,200alpha30]"));
        let _ = std::fs::remove_file(&path);
    }
}
