//! CSV and JSON export of aligned returns.

use chrono::NaiveDate;
use navtrack_series::AlignedReturns;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
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
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// One aligned period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnRecord {
    /// Period date.
    pub date: NaiveDate,

    /// Portfolio return.
    pub portfolio: f64,

    /// Benchmark return.
    pub benchmark: f64,
}

/// Aligned returns with their labels and range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnsExport {
    /// Portfolio label.
    pub portfolio_label: String,

    /// Benchmark label.
    pub benchmark_label: String,

    /// First aligned date.
    pub start: NaiveDate,

    /// Last aligned date.
    pub end: NaiveDate,

    /// Periods in date order.
    pub records: Vec<ReturnRecord>,
}

impl ReturnsExport {
    /// Build from aligned returns.
    pub fn from_aligned(aligned: &AlignedReturns) -> Self {
        let records = aligned
            .portfolio()
            .iter()
            .zip(aligned.benchmark().values())
            .map(|((date, portfolio), benchmark)| ReturnRecord {
                date,
                portfolio,
                benchmark: *benchmark,
            })
            .collect();

        Self {
            portfolio_label: aligned.portfolio().name().to_string(),
            benchmark_label: aligned.benchmark().name().to_string(),
            start: aligned.start(),
            end: aligned.end(),
            records,
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for ReturnsExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in &self.records {
                    wtr.serialize(record)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navtrack_series::{ReturnSeries, align};
    use rstest::rstest;

    fn export() -> ReturnsExport {
        let dates: Vec<NaiveDate> = (2..=4)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
            .collect();
        let p = ReturnSeries::new("Portfolio", dates.clone(), vec![0.02, -0.01, 0.005]).unwrap();
        let b = ReturnSeries::new("Nifty50", dates, vec![0.005, 0.001, -0.002]).unwrap();
        ReturnsExport::from_aligned(&align(&p, &b).unwrap())
    }

    #[test]
    fn test_csv() {
        let csv = export().export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,portfolio,benchmark"));
        assert_eq!(lines.next(), Some("2024-01-02,0.02,0.005"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_json() {
        let json = export().export_to_string(ExportFormat::Json).unwrap();
        let parsed: ReturnsExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, export());
        assert!(json.contains(r#""start":"2024-01-02""#));
        assert!(!json.contains('\n'));

        let pretty = export().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join(format!("navtrack-export-{}.csv", std::process::id()));
        export().export_to_file(&path, ExportFormat::Csv).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("date,portfolio,benchmark"));
        std::fs::remove_file(&path).ok();
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv, "csv")]
    #[case("JSON", ExportFormat::Json, "json")]
    #[case("pretty-json", ExportFormat::PrettyJson, "json")]
    fn test_format_parsing(
        #[case] input: &str,
        #[case] expected: ExportFormat,
        #[case] extension: &str,
    ) {
        let format: ExportFormat = input.parse().unwrap();
        assert_eq!(format, expected);
        assert_eq!(format.extension(), extension);
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(f)) if f == "xml"
        ));
    }
}
