//! Dashboard configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) is a valid configuration:
//!
//! ```toml
//! [source]
//! location = "https://example.com/sheet.csv"
//!
//! [columns]
//! date = "Date"
//! nav = "NAV"
//! benchmark_change = "Nifty50 Change %"
//!
//! [sanitize]
//! sentinels = ["Portfolio Value", "Absolute Gain", "Nifty50", "Day Change"]
//!
//! [report]
//! title = "Portfolio Performance Analysis"
//! portfolio_label = "Portfolio"
//! benchmark_label = "Nifty50"
//! risk_free_rate = 0.0
//! periods_per_year = 252
//! output = "navtrack-report.html"
//! ```

use navtrack_data::{ColumnMap, Source};
use navtrack_output::ReportOptions;
use navtrack_series::PipelineConfig;
use navtrack_series::sanitize::{DEFAULT_SENTINELS, SentinelLabels};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where the export is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSection {
    /// URL or file path of the CSV export
    pub location: Option<String>,
}

/// Column names in the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnsSection {
    /// Date column
    pub date: String,
    /// Portfolio valuation column
    pub nav: String,
    /// Benchmark percentage change column
    pub benchmark_change: String,
}

impl Default for ColumnsSection {
    fn default() -> Self {
        let columns = ColumnMap::default();
        Self {
            date: columns.date,
            nav: columns.nav,
            benchmark_change: columns.benchmark_change,
        }
    }
}

/// Row sanitizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanitizeSection {
    /// Date-column labels marking summary rows
    pub sentinels: Vec<String>,
}

impl Default for SanitizeSection {
    fn default() -> Self {
        Self {
            sentinels: DEFAULT_SENTINELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Report and page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    /// Page and report title
    pub title: String,
    /// Portfolio series label
    pub portfolio_label: String,
    /// Benchmark series label
    pub benchmark_label: String,
    /// Annual risk-free rate as a fraction
    pub risk_free_rate: f64,
    /// Return periods per year
    pub periods_per_year: u32,
    /// Output HTML path
    pub output: PathBuf,
}

impl Default for ReportSection {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            title: "Portfolio Performance Analysis".to_string(),
            portfolio_label: pipeline.portfolio_label,
            benchmark_label: pipeline.benchmark_label,
            risk_free_rate: 0.0,
            periods_per_year: 252,
            output: PathBuf::from("navtrack-report.html"),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Source settings
    pub source: SourceSection,
    /// Column names
    pub columns: ColumnsSection,
    /// Sanitizer settings
    pub sanitize: SanitizeSection,
    /// Report settings
    pub report: ReportSection,
}

impl DashboardConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Self::from_toml(&content)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_path(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Serialize as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges and consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let report = &self.report;
        if report.periods_per_year == 0 {
            return Err(ConfigError::Invalid(
                "report.periods_per_year must be positive".to_string(),
            ));
        }
        if !report.risk_free_rate.is_finite() {
            return Err(ConfigError::Invalid(
                "report.risk_free_rate must be finite".to_string(),
            ));
        }
        if report.portfolio_label.trim().is_empty() || report.benchmark_label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "report labels must not be empty".to_string(),
            ));
        }
        if report.portfolio_label == report.benchmark_label {
            return Err(ConfigError::Invalid(format!(
                "portfolio and benchmark share the label '{}'",
                report.portfolio_label
            )));
        }

        let c = &self.columns;
        let names = [&c.date, &c.nav, &c.benchmark_change];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "column names must not be empty".to_string(),
            ));
        }
        if c.date == c.nav || c.date == c.benchmark_change || c.nav == c.benchmark_change {
            return Err(ConfigError::Invalid(
                "column names must be distinct".to_string(),
            ));
        }

        if let Some(location) = &self.source.location {
            location
                .parse::<Source>()
                .map_err(|e| ConfigError::Invalid(format!("source.location: {e}")))?;
        }

        Ok(())
    }

    /// Configured source, if any.
    pub fn source(&self) -> Result<Option<Source>, ConfigError> {
        self.source
            .location
            .as_deref()
            .map(|location| location.parse::<Source>())
            .transpose()
            .map_err(|e| ConfigError::Invalid(format!("source.location: {e}")))
    }

    /// Column names for projecting raw records.
    pub fn column_map(&self) -> ColumnMap {
        ColumnMap {
            date: self.columns.date.clone(),
            nav: self.columns.nav.clone(),
            benchmark_change: self.columns.benchmark_change.clone(),
        }
    }

    /// Settings for the series pipeline.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            sentinels: SentinelLabels::new(self.sanitize.sentinels.iter().cloned()),
            portfolio_label: self.report.portfolio_label.clone(),
            benchmark_label: self.report.benchmark_label.clone(),
        }
    }

    /// Settings for the statistics report.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            title: self.report.title.clone(),
            risk_free_rate: self.report.risk_free_rate,
            periods_per_year: self.report.periods_per_year,
            ..ReportOptions::default()
        }
    }
}
