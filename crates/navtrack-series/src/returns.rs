//! Period return series.

use crate::error::{PipelineError, Result};
use crate::normalize::Observation;
use chrono::NaiveDate;

/// Date-indexed fractional returns with strictly ascending dates.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Create a series, validating lengths and date order.
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(PipelineError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(PipelineError::Unordered { date: w[1] });
        }

        Ok(Self {
            name: name.into(),
            dates,
            values,
        })
    }

    /// Build from `(date, value)` pairs already in ascending date order.
    pub(crate) fn from_sorted_pairs(
        name: &str,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        let (dates, values) = pairs.into_iter().unzip();
        Self {
            name: name.to_string(),
            dates,
            values,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return a copy of this series under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Returns aligned with [`ReturnSeries::dates`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns `true` if the series has no periods.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// First and last date.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    /// Restrict to dates within `[start, end]`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end).max(lo);
        Self {
            name: self.name.clone(),
            dates: self.dates[lo..hi].to_vec(),
            values: self.values[lo..hi].to_vec(),
        }
    }
}

/// Period-over-period NAV change, dated at the later observation.
///
/// The first observation has no predecessor and yields no entry.
pub fn portfolio_returns(observations: &[Observation], name: &str) -> ReturnSeries {
    ReturnSeries::from_sorted_pairs(
        name,
        observations
            .windows(2)
            .map(|w| (w[1].date, (w[1].nav - w[0].nav) / w[0].nav)),
    )
}

/// Benchmark changes taken as returns, skipping missing entries.
pub fn benchmark_returns(observations: &[Observation], name: &str) -> ReturnSeries {
    ReturnSeries::from_sorted_pairs(
        name,
        observations
            .iter()
            .filter_map(|o| o.benchmark_change.map(|c| (o.date, c))),
    )
}
