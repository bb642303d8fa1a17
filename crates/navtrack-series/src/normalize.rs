//! Typed observations from sanitized rows.

use crate::error::{Field, PipelineError, Result};
use chrono::NaiveDate;
use navtrack_data::RawRow;

/// Date format of the export, e.g. `01-Jan-24`.
pub const DATE_FORMAT: &str = "%d-%b-%y";

/// A cleaned daily observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Calendar date, no time-of-day or offset
    pub date: NaiveDate,
    /// Portfolio valuation
    pub nav: f64,
    /// Fractional benchmark change (0.012 for 1.2%), `None` when the cell was missing
    pub benchmark_change: Option<f64>,
    /// Source line, kept for diagnostics
    pub line: u64,
}

/// Parse, sort and validate sanitized rows.
///
/// Dates are parsed first and rows stably sorted by date before the numeric
/// fields are coerced, so a malformed NAV is reported regardless of position.
/// Repeated dates are rejected with [`PipelineError::DuplicateDate`].
pub fn normalize(rows: &[RawRow]) -> Result<Vec<Observation>> {
    if rows.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let mut dated = rows
        .iter()
        .map(|row| Ok((parse_date(row)?, row)))
        .collect::<Result<Vec<_>>>()?;

    // Vec::sort_by_key is stable: ties keep file order.
    dated.sort_by_key(|(date, _)| *date);

    if let Some(pair) = dated.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(PipelineError::DuplicateDate {
            date: pair[0].0,
            first_line: pair[0].1.line,
            second_line: pair[1].1.line,
        });
    }

    dated
        .into_iter()
        .map(|(date, row)| {
            Ok(Observation {
                date,
                nav: parse_nav(row)?,
                benchmark_change: parse_change(row)?,
                line: row.line,
            })
        })
        .collect()
}

fn parse_date(row: &RawRow) -> Result<NaiveDate> {
    let raw = row.date.as_deref().ok_or_else(|| PipelineError::Parse {
        line: row.line,
        field: Field::Date,
        value: String::new(),
        reason: "missing date".to_string(),
    })?;

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| PipelineError::Parse {
        line: row.line,
        field: Field::Date,
        value: raw.to_string(),
        reason: format!("expected {}: {}", DATE_FORMAT, e),
    })
}

fn parse_nav(row: &RawRow) -> Result<f64> {
    // sanitize() guarantees presence; treat absence like any other bad value
    let raw = row.nav.as_deref().unwrap_or_default();
    raw.parse::<f64>().map_err(|e| PipelineError::Parse {
        line: row.line,
        field: Field::Nav,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_change(row: &RawRow) -> Result<Option<f64>> {
    row.benchmark_change
        .as_deref()
        .map(|raw| {
            parse_percent(raw).ok_or_else(|| PipelineError::Parse {
                line: row.line,
                field: Field::BenchmarkChange,
                value: raw.to_string(),
                reason: "not a number".to_string(),
            })
        })
        .transpose()
}

/// Parse `"1.2%"` (or `"1.2"`) into `0.012`.
///
/// Trailing `%` signs are optional; the value is always read as a percentage.
pub fn parse_percent(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_end_matches('%')
        .trim_end()
        .parse::<f64>()
        .ok()
        .map(|v| v / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parses_and_sorts() {
        let rows = vec![
            RawRow::new(2, "03-Jan-24", "103", "0.1%"),
            RawRow::new(3, "01-Jan-24", "100", "1%"),
            RawRow::new(4, "02-Jan-24", "102.5", ""),
        ];

        let obs = normalize(&rows).unwrap();
        let dates: Vec<NaiveDate> = obs.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert_eq!(obs[0].line, 3);
        assert_relative_eq!(obs[1].nav, 102.5);
        assert_eq!(obs[1].benchmark_change, None);
        assert_relative_eq!(obs[0].benchmark_change.unwrap(), 0.01);
    }

    #[test]
    fn test_dates_strictly_ascending() {
        let rows: Vec<RawRow> = [17, 3, 28, 9, 1, 14]
            .iter()
            .enumerate()
            .map(|(i, d)| RawRow::new(i as u64 + 2, &format!("{:02}-Mar-23", d), "10", "0%"))
            .collect();

        let obs = normalize(&rows).unwrap();
        assert!(obs.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(normalize(&[]), Err(PipelineError::EmptyDataset)));
    }

    #[test]
    fn test_non_numeric_nav() {
        let rows = vec![RawRow::new(7, "01-Jan-24", "abc", "1%")];
        match normalize(&rows) {
            Err(PipelineError::Parse { line, field, value, .. }) => {
                assert_eq!(line, 7);
                assert_eq!(field, Field::Nav);
                assert_eq!(value, "abc");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("2024-01-01")]
    #[case("1/1/24")]
    #[case("Total")]
    fn test_bad_date_is_fatal(#[case] raw: &str) {
        let rows = vec![
            RawRow::new(2, "01-Jan-24", "100", "1%"),
            RawRow::new(3, raw, "101", "1%"),
        ];
        assert!(matches!(
            normalize(&rows),
            Err(PipelineError::Parse { field: Field::Date, line: 3, .. })
        ));
    }

    #[test]
    fn test_missing_date_is_fatal() {
        let rows = vec![RawRow::new(2, "", "100", "1%")];
        assert!(matches!(
            normalize(&rows),
            Err(PipelineError::Parse { field: Field::Date, .. })
        ));
    }

    // Two-digit years: 00-69 land in 2000-2069, 70-99 in 1970-1999.
    #[rstest]
    #[case("01-Jan-00", date(2000, 1, 1))]
    #[case("15-Mar-24", date(2024, 3, 15))]
    #[case("01-Jan-68", date(2068, 1, 1))]
    #[case("01-Jan-69", date(2069, 1, 1))]
    #[case("01-Jan-70", date(1970, 1, 1))]
    #[case("31-Dec-99", date(1999, 12, 31))]
    fn test_two_digit_year_pivot(#[case] raw: &str, #[case] expected: NaiveDate) {
        let row = RawRow::new(2, raw, "100", "1%");
        assert_eq!(parse_date(&row).unwrap(), expected);
    }

    #[test]
    fn test_bad_change_is_fatal() {
        let rows = vec![RawRow::new(2, "01-Jan-24", "100", "n.a.%")];
        assert!(matches!(
            normalize(&rows),
            Err(PipelineError::Parse { field: Field::BenchmarkChange, .. })
        ));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let rows = vec![
            RawRow::new(2, "02-Jan-24", "101", "1%"),
            RawRow::new(3, "01-Jan-24", "100", "1%"),
            RawRow::new(4, "02-Jan-24", "102", "1%"),
        ];
        match normalize(&rows) {
            Err(PipelineError::DuplicateDate { date: d, first_line, second_line }) => {
                assert_eq!(d, date(2024, 1, 2));
                assert_eq!((first_line, second_line), (2, 4));
            }
            other => panic!("expected duplicate date, got {other:?}"),
        }
    }

    #[rstest]
    #[case("1%", 0.01)]
    #[case("-0.25%", -0.0025)]
    #[case(" 2.5 % ", 0.025)]
    #[case("0.5", 0.005)]
    #[case("1%%", 0.01)]
    fn test_parse_percent(#[case] raw: &str, #[case] expected: f64) {
        assert_relative_eq!(parse_percent(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_percent_rejects_text() {
        assert!(parse_percent("abc%").is_none());
        assert!(parse_percent("%").is_none());
    }
}
