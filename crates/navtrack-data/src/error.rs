//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while fetching or reading a source.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// Status code returned by the server
        status: u16,
        /// Requested URL
        url: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Missing column '{column}' (found: {available})")]
    MissingColumn {
        /// Column that was looked up
        column: String,
        /// Comma separated header of the table
        available: String,
    },

    /// Source identifier that is neither a URL nor a usable path
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),
}

impl DataError {
    /// Build a [`DataError::MissingColumn`] from the header that was searched.
    pub(crate) fn missing_column(column: &str, headers: &csv::StringRecord) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            available: headers.iter().collect::<Vec<_>>().join(", "),
        }
    }
}
