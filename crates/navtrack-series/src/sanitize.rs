//! Removal of spreadsheet footer rows and rows without a valuation.

use navtrack_data::RawRow;
use tracing::debug;

/// Labels that appear in the date column of summary rows.
pub const DEFAULT_SENTINELS: &[&str] = &["Portfolio Value", "Absolute Gain", "Nifty50", "Day Change"];

/// Set of non-date labels identifying summary rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelLabels {
    labels: Vec<String>,
}

impl SentinelLabels {
    /// Create a label set. Labels are compared after trimming.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|l| l.into().trim().to_string())
                .collect(),
        }
    }

    /// Returns `true` if the date cell is a sentinel label.
    pub fn matches(&self, date: &str) -> bool {
        let date = date.trim();
        self.labels.iter().any(|l| l == date)
    }

    /// The labels in this set.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Default for SentinelLabels {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINELS.iter().copied())
    }
}

/// Drop summary rows and rows without a NAV, keeping the order of the rest.
///
/// Never fails: an empty result is reported by the normalizer.
pub fn sanitize(rows: Vec<RawRow>, sentinels: &SentinelLabels) -> Vec<RawRow> {
    let total = rows.len();
    let kept: Vec<RawRow> = rows
        .into_iter()
        .filter(|row| {
            !row.date.as_deref().is_some_and(|d| sentinels.matches(d)) && row.nav.is_some()
        })
        .collect();

    debug!(total, kept = kept.len(), dropped = total - kept.len(), "rows sanitized");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_sentinels_and_missing_nav() {
        let rows = vec![
            RawRow::new(2, "01-Jan-24", "100", "1%"),
            RawRow::new(3, "Portfolio Value", "123456", ""),
            RawRow::new(4, "02-Jan-24", "", "0.5%"),
            RawRow::new(5, "03-Jan-24", "101", "0.2%"),
            RawRow::new(6, " Day Change ", "12", "1%"),
        ];

        let kept = sanitize(rows, &SentinelLabels::default());
        let lines: Vec<u64> = kept.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 5]);
    }

    #[test]
    fn test_preserves_relative_order() {
        let rows: Vec<RawRow> = (0..20)
            .map(|i| {
                let nav = if i % 3 == 0 { "" } else { "100" };
                RawRow::new(i, &format!("{:02}-Jan-24", 20 - i), nav, "")
            })
            .collect();

        let kept = sanitize(rows, &SentinelLabels::default());
        assert!(kept.windows(2).all(|w| w[0].line < w[1].line));
        assert_eq!(kept.len(), 13);
    }

    #[test]
    fn test_malformed_nav_is_kept() {
        let rows = vec![RawRow::new(2, "01-Jan-24", "abc", "1%")];
        assert_eq!(sanitize(rows, &SentinelLabels::default()).len(), 1);
    }

    #[test]
    fn test_custom_sentinels() {
        let sentinels = SentinelLabels::new(["Total"]);
        let rows = vec![
            RawRow::new(2, "Total", "100", ""),
            RawRow::new(3, "Nifty50", "100", ""),
        ];

        let kept = sanitize(rows, &sentinels);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].line, 3);
    }
}
