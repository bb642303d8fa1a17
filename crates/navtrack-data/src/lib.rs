#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/navtrack/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod loader;
pub mod source;
pub mod table;

pub use cache::{CacheStats, SourceCache};
pub use error::{DataError, Result};
pub use loader::{CsvLoader, FetchConfig};
pub use source::Source;
pub use table::{ColumnMap, RawRow, RawTable};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
