//! Fetch and series stages for one source.
//!
//! Holds the loader and the in-memory source cache for the lifetime of the
//! process, and runs fetch → sanitize → normalize → returns → align.

use indicatif::ProgressBar;
use navtrack::DashboardConfig;
use navtrack_data::{CacheStats, CsvLoader, DataError, FetchConfig, RawTable, Source, SourceCache};
use navtrack_output::{ChartError, ExportError, ReportError};
use navtrack_series::{PipelineError, PreparedSeries, prepare};
use std::sync::Arc;
use tracing::{debug, info};

/// Error type for data pipeline operations.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DataPipelineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] navtrack::ConfigError),
    /// No source given on the command line or in the config file.
    #[error("No source configured: pass --source or set [source] location in {0}")]
    MissingSource(String),
    /// Fetch error.
    #[error("Data fetch error: {0}")]
    Fetch(#[from] DataError),
    /// Cleaning or alignment error.
    #[error("Data processing error: {0}")]
    Pipeline(#[from] PipelineError),
    /// Chart construction error.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
    /// Statistics report error.
    #[error("Error generating statistics report: {0}")]
    Report(#[from] ReportError),
    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Resolve the source from the command line, falling back to the config.
pub(crate) fn resolve_source(
    flag: Option<&str>,
    config: &DashboardConfig,
    config_path: &str,
) -> Result<Source, DataPipelineError> {
    match flag {
        Some(location) => Ok(location.parse()?),
        None => config
            .source()?
            .ok_or_else(|| DataPipelineError::MissingSource(config_path.to_string())),
    }
}

/// Loader, cache and configuration for one run.
#[derive(Debug)]
pub(crate) struct DataPipeline {
    loader: CsvLoader,
    cache: SourceCache,
    config: DashboardConfig,
}

impl DataPipeline {
    /// Create a pipeline with an empty cache.
    pub(crate) fn new(config: DashboardConfig) -> Result<Self, DataPipelineError> {
        Ok(Self {
            loader: CsvLoader::new()?,
            cache: SourceCache::new(),
            config,
        })
    }

    /// Fetch a source, consulting the cache according to `fetch`.
    pub(crate) async fn fetch(
        &mut self,
        source: &Source,
        fetch: FetchConfig,
        progress: Option<&ProgressBar>,
    ) -> Result<Arc<RawTable>, DataPipelineError> {
        if let Some(pb) = progress {
            pb.set_message(format!("Fetching {source}..."));
        }

        let result = self.loader.load_cached(&mut self.cache, source, fetch).await;

        if let Some(pb) = progress {
            match &result {
                Ok(table) => pb.finish_with_message(format!("Fetched {} rows", table.len())),
                Err(_) => pb.finish_with_message("Failed!"),
            }
        }

        let stats = self.cache_stats();
        debug!(
            entries = stats.entries,
            hits = stats.hits,
            misses = stats.misses,
            "source cache"
        );
        Ok(result?)
    }

    /// Run the series stages over a fetched table.
    pub(crate) fn prepare(&self, table: &RawTable) -> Result<PreparedSeries, DataPipelineError> {
        let rows = table.rows(&self.config.column_map())?;
        let prepared = prepare(rows, &self.config.pipeline_config())?;
        info!(
            start = %prepared.aligned.start(),
            end = %prepared.aligned.end(),
            periods = prepared.aligned.len(),
            "returns aligned"
        );
        Ok(prepared)
    }

    /// Fetch and prepare in one step.
    pub(crate) async fn run(
        &mut self,
        source: &Source,
        fetch: FetchConfig,
        progress: Option<&ProgressBar>,
    ) -> Result<PreparedSeries, DataPipelineError> {
        let table = self.fetch(source, fetch, progress).await?;
        self.prepare(&table)
    }

    /// Source cache counters.
    pub(crate) fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sheet(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("navtrack-{name}-{}.csv", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    const SHEET: &str = "\
Date,NAV,Nifty50 Change %
01-Jan-24,100,1%
02-Jan-24,102,0.5%
03-Jan-24,101,-0.2%
Portfolio Value,101,
";

    #[tokio::test]
    async fn test_run_from_file() {
        let path = sheet("run", SHEET);
        let source = Source::File(path.clone());

        let mut pipeline = DataPipeline::new(DashboardConfig::default()).unwrap();
        let prepared = pipeline
            .run(&source, FetchConfig::default(), None)
            .await
            .unwrap();
        assert_eq!(prepared.aligned.len(), 2);

        // Second run is served from the cache.
        pipeline
            .run(&source, FetchConfig::default(), None)
            .await
            .unwrap();
        let stats = pipeline.cache_stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let source = Source::File(PathBuf::from("/nonexistent/navtrack/sheet.csv"));
        let mut pipeline = DataPipeline::new(DashboardConfig::default()).unwrap();
        let result = pipeline.run(&source, FetchConfig::default(), None).await;
        assert!(matches!(result, Err(DataPipelineError::Fetch(DataError::Io(_)))));
    }

    #[tokio::test]
    async fn test_wrong_columns() {
        let path = sheet("columns", "Day,Value\n01-Jan-24,100\n");
        let mut pipeline = DataPipeline::new(DashboardConfig::default()).unwrap();
        let result = pipeline
            .run(&Source::File(path.clone()), FetchConfig::default(), None)
            .await;
        assert!(matches!(
            result,
            Err(DataPipelineError::Fetch(DataError::MissingColumn { .. }))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_resolve_source() {
        let config = DashboardConfig::default();
        assert!(matches!(
            resolve_source(None, &config, "config.toml"),
            Err(DataPipelineError::MissingSource(_))
        ));

        let source = resolve_source(Some("https://example.com/x.csv"), &config, "config.toml").unwrap();
        assert!(source.is_remote());
    }
}
