//! Untyped tabular data as read from a CSV export.

use crate::error::{DataError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;

/// Cell values treated as missing, matching common spreadsheet/CSV exports.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns `true` if a (trimmed) cell denotes a missing value.
pub fn is_na(cell: &str) -> bool {
    NA_VALUES.contains(&cell.trim())
}

/// Names of the columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    /// Observation date column
    pub date: String,
    /// Portfolio valuation column
    pub nav: String,
    /// Benchmark period change column (percent formatted)
    pub benchmark_change: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            nav: "NAV".to_string(),
            benchmark_change: "Nifty50 Change %".to_string(),
        }
    }
}

/// One untyped record of the export.
///
/// Missing cells (see [`NA_VALUES`]) are `None`; present cells are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the source file
    pub line: u64,
    /// Date cell, or a sentinel label on footer rows
    pub date: Option<String>,
    /// NAV cell
    pub nav: Option<String>,
    /// Benchmark change cell, e.g. `"1.2%"`
    pub benchmark_change: Option<String>,
}

impl RawRow {
    /// Create a row from string cells, treating NA tokens as missing.
    pub fn new(line: u64, date: &str, nav: &str, benchmark_change: &str) -> Self {
        Self {
            line,
            date: present(Some(date)),
            nav: present(Some(nav)),
            benchmark_change: present(Some(benchmark_change)),
        }
    }
}

/// Header and records of a CSV export, in file order.
#[derive(Debug, Clone)]
pub struct RawTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl RawTable {
    /// Parse a CSV document with a header row.
    ///
    /// Rows may be ragged; short rows simply lack their trailing cells.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { headers, records })
    }

    /// Parse an in-memory CSV document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(bytes)
    }

    /// Number of data records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the export has no data records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Project every record onto the configured columns.
    pub fn rows(&self, columns: &ColumnMap) -> Result<Vec<RawRow>> {
        let date_idx = self.column_index(&columns.date)?;
        let nav_idx = self.column_index(&columns.nav)?;
        let change_idx = self.column_index(&columns.benchmark_change)?;

        let rows = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| RawRow {
                // header occupies line 1
                line: record
                    .position()
                    .map_or(i as u64 + 2, |pos| pos.line()),
                date: present(record.get(date_idx)),
                nav: present(record.get(nav_idx)),
                benchmark_change: present(record.get(change_idx)),
            })
            .collect();

        Ok(rows)
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
            .ok_or_else(|| DataError::missing_column(name, &self.headers))
    }
}

fn present(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|c| !is_na(c))
        .map(str::to_string)
}
