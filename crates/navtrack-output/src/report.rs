//! Statistics report comparing a portfolio with its benchmark.

use crate::chart::escape_html;
use crate::stats::{
    ComparisonMetrics, Drawdown, PerformanceMetrics, YearlyReturn, comparison_metrics,
    performance_metrics, top_drawdowns, yearly_comparison,
};
use chrono::{DateTime, NaiveDate, Utc};
use navtrack_series::ReturnSeries;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of aligned observations for a report.
pub const MIN_OBSERVATIONS: usize = 2;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Too few observations for meaningful statistics.
    #[error("Insufficient data: {observations} observation(s), at least {required} required")]
    InsufficientData {
        /// Observations available
        observations: usize,
        /// Observations required
        required: usize,
    },

    /// Portfolio and benchmark do not share the same dates.
    #[error("Portfolio and benchmark dates differ ({portfolio} vs {benchmark} periods)")]
    MismatchedDates {
        /// Portfolio length
        portfolio: usize,
        /// Benchmark length
        benchmark: usize,
    },

    /// A return is NaN or infinite.
    #[error("Non-finite return in '{series}' on {date}")]
    NonFiniteReturn {
        /// Series name
        series: String,
        /// Date of the value
        date: NaiveDate,
    },

    /// Report options are out of range.
    #[error("Invalid report options: {0}")]
    InvalidOptions(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Settings for [`StatsReport::generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Report heading.
    pub title: String,

    /// Annual risk-free rate as a fraction.
    pub risk_free_rate: f64,

    /// Return periods per year, used for annualization.
    pub periods_per_year: u32,

    /// Number of drawdown periods listed.
    pub top_drawdowns: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Portfolio Tearsheet".to_string(),
            risk_free_rate: 0.0,
            periods_per_year: 252,
            top_drawdowns: 5,
        }
    }
}

/// Computed statistics for one portfolio/benchmark pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    /// Report heading.
    pub title: String,

    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// First aligned date.
    pub start: NaiveDate,

    /// Last aligned date.
    pub end: NaiveDate,

    /// Portfolio series name.
    pub portfolio_name: String,

    /// Benchmark series name.
    pub benchmark_name: String,

    /// Annual risk-free rate used.
    pub risk_free_rate: f64,

    /// Portfolio metrics.
    pub portfolio: PerformanceMetrics,

    /// Benchmark metrics.
    pub benchmark: PerformanceMetrics,

    /// Relative metrics.
    pub comparison: ComparisonMetrics,

    /// Deepest portfolio drawdowns.
    pub drawdowns: Vec<Drawdown>,

    /// Calendar-year returns.
    pub yearly: Vec<YearlyReturn>,
}

impl StatsReport {
    /// Compute the report for two aligned series.
    pub fn generate(
        portfolio: &ReturnSeries,
        benchmark: &ReturnSeries,
        options: &ReportOptions,
    ) -> Result<Self, ReportError> {
        if options.periods_per_year == 0 {
            return Err(ReportError::InvalidOptions(
                "periods_per_year must be positive".to_string(),
            ));
        }
        if !options.risk_free_rate.is_finite() {
            return Err(ReportError::InvalidOptions(
                "risk_free_rate must be finite".to_string(),
            ));
        }
        if portfolio.dates() != benchmark.dates() {
            return Err(ReportError::MismatchedDates {
                portfolio: portfolio.len(),
                benchmark: benchmark.len(),
            });
        }
        if portfolio.len() < MIN_OBSERVATIONS {
            return Err(ReportError::InsufficientData {
                observations: portfolio.len(),
                required: MIN_OBSERVATIONS,
            });
        }
        check_finite(portfolio)?;
        check_finite(benchmark)?;

        let (start, end) = portfolio.date_range().ok_or(ReportError::InsufficientData {
            observations: 0,
            required: MIN_OBSERVATIONS,
        })?;

        let rf = options.risk_free_rate;
        let ppy = options.periods_per_year;

        Ok(Self {
            title: options.title.clone(),
            generated_at: Utc::now(),
            start,
            end,
            portfolio_name: portfolio.name().to_string(),
            benchmark_name: benchmark.name().to_string(),
            risk_free_rate: rf,
            portfolio: performance_metrics(portfolio, rf, ppy),
            benchmark: performance_metrics(benchmark, rf, ppy),
            comparison: comparison_metrics(portfolio, benchmark, rf, ppy),
            drawdowns: top_drawdowns(portfolio, options.top_drawdowns),
            yearly: yearly_comparison(portfolio, benchmark),
        })
    }

    /// Convert the report to a JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as a self-contained HTML fragment.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str(r#"<section class="nt-report">"#);
        html.push_str(&format!("<h2>{}</h2>", escape_html(&self.title)));
        html.push_str(&format!(
            r#"<p class="nt-period">{} to {}</p>"#,
            self.start, self.end
        ));

        html.push_str(&format!(
            "<table><thead><tr><th>Metric</th><th>{}</th><th>{}</th></tr></thead><tbody>",
            escape_html(&self.portfolio_name),
            escape_html(&self.benchmark_name)
        ));
        for (label, p, b) in self.metric_rows() {
            html.push_str(&format!("<tr><td>{label}</td><td>{p}</td><td>{b}</td></tr>"));
        }
        html.push_str("</tbody></table>");

        html.push_str("<h3>Relative</h3><table><tbody>");
        for (label, value) in self.comparison_rows() {
            html.push_str(&format!("<tr><td>{label}</td><td>{value}</td></tr>"));
        }
        html.push_str("</tbody></table>");

        html.push_str("<h3>Worst Drawdowns</h3>");
        if self.drawdowns.is_empty() {
            html.push_str("<p>No drawdowns</p>");
        } else {
            html.push_str(
                "<table><thead><tr><th>Started</th><th>Trough</th><th>Recovered</th>\
                 <th>Drawdown</th><th>Days</th></tr></thead><tbody>",
            );
            for dd in &self.drawdowns {
                let recovered = if dd.recovered {
                    dd.end.to_string()
                } else {
                    "-".to_string()
                };
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    dd.start,
                    dd.trough,
                    recovered,
                    pct(dd.depth),
                    dd.days
                ));
            }
            html.push_str("</tbody></table>");
        }

        html.push_str(&format!(
            "<h3>Yearly Returns</h3><table><thead><tr><th>Year</th><th>{}</th><th>{}</th></tr></thead><tbody>",
            escape_html(&self.portfolio_name),
            escape_html(&self.benchmark_name)
        ));
        for year in &self.yearly {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                year.year,
                pct(year.portfolio),
                year.benchmark.map(pct).unwrap_or_else(|| "-".to_string())
            ));
        }
        html.push_str("</tbody></table></section>");
        html
    }

    /// Format as an ASCII table for terminal output.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&format!("Period: {} to {}\n", self.start, self.end));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<24}{:>20}{:>20}\n",
            "Metric", self.portfolio_name, self.benchmark_name
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');
        for (label, p, b) in self.metric_rows() {
            output.push_str(&format!("{label:<24}{p:>20}{b:>20}\n"));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        for (label, value) in self.comparison_rows() {
            output.push_str(&format!("{label:<24}{value:>20}\n"));
        }

        if !self.drawdowns.is_empty() {
            output.push_str(&"-".repeat(64));
            output.push_str("\nWorst Drawdowns:\n");
            for (i, dd) in self.drawdowns.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {} -> {}  {:>8}  {} days\n",
                    i + 1,
                    dd.start,
                    dd.end,
                    pct(dd.depth),
                    dd.days
                ));
            }
        }

        output.push_str(&"=".repeat(64));
        output.push('\n');
        output
    }

    fn metric_rows(&self) -> Vec<(&'static str, String, String)> {
        let (p, b) = (&self.portfolio, &self.benchmark);
        vec![
            ("Risk-Free Rate", pct(self.risk_free_rate), pct(self.risk_free_rate)),
            ("Periods", p.periods.to_string(), b.periods.to_string()),
            ("Cumulative Return", pct(p.total_return), pct(b.total_return)),
            ("CAGR", pct(p.cagr), pct(b.cagr)),
            ("Volatility (ann.)", pct(p.volatility), pct(b.volatility)),
            ("Sharpe", num(p.sharpe), num(b.sharpe)),
            ("Sortino", num(p.sortino), num(b.sortino)),
            ("Max Drawdown", pct(p.max_drawdown), pct(b.max_drawdown)),
            (
                "Longest DD Days",
                p.max_drawdown_days.to_string(),
                b.max_drawdown_days.to_string(),
            ),
            ("Calmar", num(p.calmar), num(b.calmar)),
            ("Best Period", pct(p.best_period), pct(b.best_period)),
            ("Worst Period", pct(p.worst_period), pct(b.worst_period)),
            ("Win Rate", pct(p.win_rate), pct(b.win_rate)),
        ]
    }

    fn comparison_rows(&self) -> Vec<(&'static str, String)> {
        let c = &self.comparison;
        vec![
            ("Beta", num(c.beta)),
            ("Alpha (ann.)", pct(c.alpha)),
            ("Correlation", num(c.correlation)),
            ("R^2", num(c.r_squared)),
            ("Tracking Error", pct(c.tracking_error)),
            ("Information Ratio", num(c.information_ratio)),
        ]
    }
}

fn check_finite(series: &ReturnSeries) -> Result<(), ReportError> {
    match series.iter().find(|(_, r)| !r.is_finite()) {
        Some((date, _)) => Err(ReportError::NonFiniteReturn {
            series: series.name().to_string(),
            date,
        }),
        None => Ok(()),
    }
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn num(value: f64) -> String {
    format!("{value:.2}")
}
