#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/navtrack/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod align;
pub mod benchmark;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod returns;
pub mod sanitize;

pub use align::{AlignedReturns, align};
pub use benchmark::BenchmarkIndex;
pub use error::{Field, PipelineError, Result};
pub use normalize::{DATE_FORMAT, Observation, normalize};
pub use pipeline::{PipelineConfig, PreparedSeries, prepare};
pub use returns::{ReturnSeries, benchmark_returns, portfolio_returns};
pub use sanitize::{SentinelLabels, sanitize};
