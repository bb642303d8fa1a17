//! Composition of the cleaning, return and alignment stages.

use crate::align::{AlignedReturns, DATE_COLUMN, align};
use crate::benchmark::BenchmarkIndex;
use crate::error::Result;
use crate::normalize::{Observation, normalize};
use crate::returns::{ReturnSeries, benchmark_returns, portfolio_returns};
use crate::sanitize::{SentinelLabels, sanitize};
use navtrack_data::RawRow;
use polars::prelude::*;
use tracing::info;

/// Settings for [`prepare`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Summary-row labels to drop
    pub sentinels: SentinelLabels,
    /// Name given to the portfolio series
    pub portfolio_label: String,
    /// Name given to the benchmark series
    pub benchmark_label: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sentinels: SentinelLabels::default(),
            portfolio_label: "Portfolio".to_string(),
            benchmark_label: "Nifty50".to_string(),
        }
    }
}

/// Everything derived from one export.
#[derive(Debug, Clone)]
pub struct PreparedSeries {
    /// Cleaned observations, strictly ascending by date
    pub observations: Vec<Observation>,
    /// Synthetic benchmark index over all observations
    pub benchmark_index: BenchmarkIndex,
    /// Portfolio returns before alignment
    pub portfolio_returns: ReturnSeries,
    /// Benchmark returns before alignment
    pub benchmark_returns: ReturnSeries,
    /// Returns restricted to the common range
    pub aligned: AlignedReturns,
}

/// Run sanitize → normalize → {synthesize, returns} → align.
pub fn prepare(rows: Vec<RawRow>, config: &PipelineConfig) -> Result<PreparedSeries> {
    let rows = sanitize(rows, &config.sentinels);
    let observations = normalize(&rows)?;

    let benchmark_index = BenchmarkIndex::synthesize(&observations);
    let portfolio_returns = portfolio_returns(&observations, &config.portfolio_label);
    let benchmark_returns = benchmark_returns(&observations, &config.benchmark_label);

    let aligned = align(&portfolio_returns, &benchmark_returns)?;
    info!(
        observations = observations.len(),
        start = %aligned.start(),
        end = %aligned.end(),
        periods = aligned.len(),
        "series prepared"
    );

    Ok(PreparedSeries {
        observations,
        benchmark_index,
        portfolio_returns,
        benchmark_returns,
        aligned,
    })
}

impl PreparedSeries {
    /// Portfolio NAV and benchmark index rebased to 1.0 over the aligned window.
    ///
    /// The base is the observation preceding the aligned start (the one the
    /// first aligned return is measured against), so the first row is 1.0 for
    /// both series. Dates without a benchmark level are null.
    pub fn growth_frame(&self) -> Result<DataFrame> {
        let start = self.aligned.start();
        let end = self.aligned.end();

        let first_in = self.observations.partition_point(|o| o.date < start);
        let base = first_in.saturating_sub(1);
        let last = self.observations.partition_point(|o| o.date <= end);

        let index_dates = self.benchmark_index.dates();
        let levels = self.benchmark_index.levels();
        let base_nav = self.observations[base].nav;
        let base_level = levels[..=base]
            .iter()
            .rev()
            .find_map(|l| *l)
            .unwrap_or(1.0);

        let window = &self.observations[base..last];
        let dates: Vec<String> = index_dates[base..last]
            .iter()
            .map(ToString::to_string)
            .collect();
        let portfolio: Vec<f64> = window.iter().map(|o| o.nav / base_nav).collect();
        let benchmark: Vec<Option<f64>> = levels[base..last]
            .iter()
            .map(|l| l.map(|level| level / base_level))
            .collect();

        let df = DataFrame::new(vec![
            Series::new(DATE_COLUMN.into(), dates).into(),
            Series::new(self.aligned.portfolio().name().into(), portfolio).into(),
            Series::new(self.aligned.benchmark().name().into(), benchmark).into(),
        ])?;

        let df = df
            .lazy()
            .with_column(col(DATE_COLUMN).cast(DataType::Date))
            .collect()?;

        Ok(df)
    }
}
