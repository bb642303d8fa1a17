//! Synthetic benchmark index levels from period changes.

use crate::normalize::Observation;
use chrono::NaiveDate;

/// Benchmark index level per observation date.
///
/// The index is seeded at 1.0 before the first observation. Dates with a
/// missing change carry no level; the running product skips them.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkIndex {
    dates: Vec<NaiveDate>,
    levels: Vec<Option<f64>>,
}

impl BenchmarkIndex {
    /// Compound the benchmark changes of a date-ordered observation sequence.
    pub fn synthesize(observations: &[Observation]) -> Self {
        let mut level = 1.0;
        let levels = observations
            .iter()
            .map(|obs| {
                obs.benchmark_change.map(|change| {
                    level *= 1.0 + change;
                    level
                })
            })
            .collect();

        Self {
            dates: observations.iter().map(|o| o.date).collect(),
            levels,
        }
    }

    /// Observation dates, one per level.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Index levels aligned with [`BenchmarkIndex::dates`].
    pub fn levels(&self) -> &[Option<f64>] {
        &self.levels
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns `true` if there are no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
