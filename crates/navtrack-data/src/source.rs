//! Source identifiers for published spreadsheets.

use crate::error::{DataError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Where a CSV export is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// HTTP(S) location, e.g. a published spreadsheet export link.
    Url(String),
    /// Local file.
    File(PathBuf),
}

impl Source {
    /// Identifier used as the cache key.
    ///
    /// URLs are keyed verbatim, files by their path as given.
    pub fn key(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::File(path) => format!("file://{}", path.display()),
        }
    }

    /// Returns `true` for remote sources.
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl FromStr for Source {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DataError::UnsupportedSource("empty source".to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Self::Url(trimmed.to_string()));
        }
        if let Some(path) = trimmed.strip_prefix("file://") {
            return Ok(Self::File(PathBuf::from(path)));
        }
        if lower.contains("://") {
            return Err(DataError::UnsupportedSource(trimmed.to_string()));
        }

        Ok(Self::File(PathBuf::from(trimmed)))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/pub?output=csv", true)]
    #[case("HTTP://example.com/data.csv", true)]
    #[case("data/nav.csv", false)]
    #[case("file:///tmp/nav.csv", false)]
    fn test_parse_source(#[case] input: &str, #[case] remote: bool) {
        let source: Source = input.parse().unwrap();
        assert_eq!(source.is_remote(), remote);
    }

    #[test]
    fn test_file_scheme_strips_prefix() {
        let source: Source = "file:///tmp/nav.csv".parse().unwrap();
        assert_eq!(source, Source::File(PathBuf::from("/tmp/nav.csv")));
        assert_eq!(source.key(), "file:///tmp/nav.csv");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("ftp://example.com/nav.csv")]
    fn test_unsupported_source(#[case] input: &str) {
        let result = input.parse::<Source>();
        assert!(matches!(result, Err(DataError::UnsupportedSource(_))));
    }
}
