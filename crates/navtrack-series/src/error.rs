//! Error types for the cleaning and alignment pipeline.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Field of a raw row that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Observation date
    Date,
    /// Portfolio valuation
    Nav,
    /// Benchmark period change
    BenchmarkChange,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Date => "date",
            Self::Nav => "NAV",
            Self::BenchmarkChange => "benchmark change",
        };
        f.write_str(name)
    }
}

/// Errors raised while turning raw rows into aligned return series.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No usable rows survived sanitization
    #[error("No usable observations in the dataset")]
    EmptyDataset,

    /// A return series has no entries
    #[error("{name} return series is empty")]
    EmptySeries {
        /// Series name
        name: String,
    },

    /// A present cell could not be parsed
    #[error("Line {line}: invalid {field} '{value}': {reason}")]
    Parse {
        /// Source line of the offending row
        line: u64,
        /// Field that failed
        field: Field,
        /// Raw cell content
        value: String,
        /// Why parsing failed
        reason: String,
    },

    /// Two observations share a date
    #[error("Duplicate date {date} on lines {first_line} and {second_line}")]
    DuplicateDate {
        /// Repeated date
        date: NaiveDate,
        /// Line of the first occurrence
        first_line: u64,
        /// Line of the second occurrence
        second_line: u64,
    },

    /// Portfolio and benchmark ranges do not intersect
    #[error(
        "Portfolio ({portfolio_start}..{portfolio_end}) and benchmark \
         ({benchmark_start}..{benchmark_end}) date ranges do not overlap"
    )]
    NoOverlap {
        /// First portfolio date
        portfolio_start: NaiveDate,
        /// Last portfolio date
        portfolio_end: NaiveDate,
        /// First benchmark date
        benchmark_start: NaiveDate,
        /// Last benchmark date
        benchmark_end: NaiveDate,
    },

    /// Dates and values of a series differ in length
    #[error("Series length mismatch: {dates} dates vs {values} values")]
    LengthMismatch {
        /// Number of dates
        dates: usize,
        /// Number of values
        values: usize,
    },

    /// Series dates are not strictly ascending
    #[error("Series dates are not strictly ascending at {date}")]
    Unordered {
        /// First date out of order
        date: NaiveDate,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
