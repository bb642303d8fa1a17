#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/navtrack/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod dashboard;
pub mod export;
pub mod report;
pub mod stats;

pub use chart::{ChartError, ChartSeries, LineChart};
pub use dashboard::DashboardPage;
pub use export::{ExportError, ExportFormat, Exporter, ReturnRecord, ReturnsExport};
pub use report::{ReportError, ReportOptions, StatsReport};
pub use stats::{
    ComparisonMetrics, Drawdown, PerformanceMetrics, YearlyReturn, comparison_metrics, drawdowns,
    performance_metrics, top_drawdowns, yearly_comparison, yearly_returns,
};
