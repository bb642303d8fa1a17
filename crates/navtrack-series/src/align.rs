//! Restricting portfolio and benchmark returns to a common date range.

use crate::error::{PipelineError, Result};
use crate::returns::ReturnSeries;
use chrono::NaiveDate;
use polars::prelude::*;
use std::cmp::Ordering;
use tracing::debug;

/// Name of the date column in frames built from aligned returns.
pub const DATE_COLUMN: &str = "date";

/// Portfolio and benchmark returns over one shared, ordered set of dates.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedReturns {
    portfolio: ReturnSeries,
    benchmark: ReturnSeries,
    start: NaiveDate,
    end: NaiveDate,
}

impl AlignedReturns {
    /// Aligned portfolio returns.
    pub const fn portfolio(&self) -> &ReturnSeries {
        &self.portfolio
    }

    /// Aligned benchmark returns.
    pub const fn benchmark(&self) -> &ReturnSeries {
        &self.benchmark
    }

    /// Start of the overlapping range (inclusive).
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// End of the overlapping range (inclusive).
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Shared dates.
    pub fn dates(&self) -> &[NaiveDate] {
        self.portfolio.dates()
    }

    /// Number of aligned periods.
    pub fn len(&self) -> usize {
        self.portfolio.len()
    }

    /// Returns `true` if no period is shared.
    pub fn is_empty(&self) -> bool {
        self.portfolio.is_empty()
    }

    /// Combined frame with a `date` column and one column per series name.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let dates: Vec<String> = self.dates().iter().map(ToString::to_string).collect();

        let df = DataFrame::new(vec![
            Series::new(DATE_COLUMN.into(), dates).into(),
            Series::new(self.portfolio.name().into(), self.portfolio.values().to_vec()).into(),
            Series::new(self.benchmark.name().into(), self.benchmark.values().to_vec()).into(),
        ])?;

        let df = df
            .lazy()
            .with_column(col(DATE_COLUMN).cast(DataType::Date))
            .collect()?;

        Ok(df)
    }
}

/// Restrict both series to their overlapping range and shared dates.
///
/// The range is `[max(first dates), min(last dates)]`, inclusive. Dates
/// present in only one series inside that range are dropped so both sides
/// end up with the same dates.
pub fn align(portfolio: &ReturnSeries, benchmark: &ReturnSeries) -> Result<AlignedReturns> {
    let (portfolio_start, portfolio_end) = range_of(portfolio)?;
    let (benchmark_start, benchmark_end) = range_of(benchmark)?;

    let start = portfolio_start.max(benchmark_start);
    let end = portfolio_end.min(benchmark_end);
    if start > end {
        return Err(PipelineError::NoOverlap {
            portfolio_start,
            portfolio_end,
            benchmark_start,
            benchmark_end,
        });
    }

    let (p, b) = intersect(&portfolio.between(start, end), &benchmark.between(start, end));
    if p.is_empty() {
        return Err(PipelineError::EmptySeries {
            name: format!("aligned {}/{}", portfolio.name(), benchmark.name()),
        });
    }

    debug!(%start, %end, periods = p.len(), "returns aligned");
    Ok(AlignedReturns {
        portfolio: p,
        benchmark: b,
        start,
        end,
    })
}

fn range_of(series: &ReturnSeries) -> Result<(NaiveDate, NaiveDate)> {
    series.date_range().ok_or_else(|| PipelineError::EmptySeries {
        name: series.name().to_string(),
    })
}

fn intersect(a: &ReturnSeries, b: &ReturnSeries) -> (ReturnSeries, ReturnSeries) {
    let mut left = Vec::with_capacity(a.len());
    let mut right = Vec::with_capacity(b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let (da, db) = (a.dates()[i], b.dates()[j]);
        match da.cmp(&db) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                left.push((da, a.values()[i]));
                right.push((db, b.values()[j]));
                i += 1;
                j += 1;
            }
        }
    }

    (
        ReturnSeries::from_sorted_pairs(a.name(), left),
        ReturnSeries::from_sorted_pairs(b.name(), right),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(name: &str, days: std::ops::RangeInclusive<u32>) -> ReturnSeries {
        let dates: Vec<NaiveDate> = days.map(date).collect();
        let values = (0..dates.len()).map(|i| i as f64 / 100.0).collect();
        ReturnSeries::new(name, dates, values).unwrap()
    }

    #[rstest]
    #[case(1..=10, 5..=20, 5, 10)]
    #[case(5..=20, 1..=10, 5, 10)]
    #[case(1..=31, 10..=12, 10, 12)]
    #[case(3..=3, 1..=5, 3, 3)]
    fn test_range_is_intersection(
        #[case] p: std::ops::RangeInclusive<u32>,
        #[case] b: std::ops::RangeInclusive<u32>,
        #[case] start: u32,
        #[case] end: u32,
    ) {
        let aligned = align(&series("Portfolio", p), &series("Nifty50", b)).unwrap();
        assert_eq!(aligned.start(), date(start));
        assert_eq!(aligned.end(), date(end));
        assert_eq!(aligned.portfolio().dates(), aligned.benchmark().dates());
        assert_eq!(aligned.len(), (end - start + 1) as usize);
    }

    #[test]
    fn test_no_overlap() {
        let result = align(&series("Portfolio", 1..=10), &series("Nifty50", 15..=20));
        match result {
            Err(PipelineError::NoOverlap {
                portfolio_end,
                benchmark_start,
                ..
            }) => {
                assert_eq!(portfolio_end, date(10));
                assert_eq!(benchmark_start, date(15));
            }
            other => panic!("expected no overlap, got {other:?}"),
        }
    }

    #[test]
    fn test_identical_series_unchanged() {
        let p = series("Portfolio", 1..=10);
        let b = p.renamed("Nifty50");

        let aligned = align(&p, &b).unwrap();
        assert_eq!(aligned.portfolio(), &p);
        assert_eq!(aligned.benchmark(), &b);
    }

    #[test]
    fn test_gaps_are_dropped_from_both_sides() {
        let p = series("Portfolio", 2..=6);
        let b = ReturnSeries::new(
            "Nifty50",
            vec![date(1), date(2), date(4), date(6)],
            vec![0.1, 0.2, 0.4, 0.6],
        )
        .unwrap();

        let aligned = align(&p, &b).unwrap();
        assert_eq!(aligned.dates(), &[date(2), date(4), date(6)]);
        assert_eq!(aligned.benchmark().values(), &[0.2, 0.4, 0.6]);
        assert_eq!(aligned.portfolio().values(), &[0.0, 0.02, 0.04]);
    }

    #[test]
    fn test_overlapping_ranges_without_shared_dates() {
        let p = ReturnSeries::new("Portfolio", vec![date(2), date(4)], vec![0.1, 0.2]).unwrap();
        let b = ReturnSeries::new("Nifty50", vec![date(3)], vec![0.3]).unwrap();

        let result = align(&p, &b);
        assert!(
            matches!(result, Err(PipelineError::EmptySeries { name }) if name == "aligned Portfolio/Nifty50")
        );
    }

    #[test]
    fn test_empty_input() {
        let empty = ReturnSeries::new("Portfolio", vec![], vec![]).unwrap();
        let result = align(&empty, &series("Nifty50", 1..=3));
        assert!(matches!(result, Err(PipelineError::EmptySeries { name }) if name == "Portfolio"));
    }

    #[test]
    fn test_to_frame() {
        let aligned = align(&series("Portfolio", 1..=5), &series("Nifty50", 3..=8)).unwrap();
        let df = aligned.to_frame().unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.get_column_names(), vec!["date", "Portfolio", "Nifty50"]);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    }
}
