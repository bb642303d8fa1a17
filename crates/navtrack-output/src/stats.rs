//! Performance statistics for return series.
//!
//! Ratios follow the usual tearsheet definitions: sample standard deviation,
//! annualization by `sqrt(periods_per_year)`, compounded total return, and
//! drawdowns measured against the running peak of the compounded wealth curve
//! starting from one unit.

use chrono::{Datelike, NaiveDate};
use navtrack_series::ReturnSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Single-series performance metrics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceMetrics {
    /// Number of return periods.
    pub periods: usize,

    /// Compounded return over the whole series.
    pub total_return: f64,

    /// Compound annual growth rate.
    pub cagr: f64,

    /// Annualized volatility.
    pub volatility: f64,

    /// Annualized Sharpe ratio.
    pub sharpe: f64,

    /// Annualized Sortino ratio.
    pub sortino: f64,

    /// Deepest drawdown as a negative fraction.
    pub max_drawdown: f64,

    /// Longest drawdown in calendar days.
    pub max_drawdown_days: i64,

    /// CAGR over the absolute max drawdown.
    pub calmar: f64,

    /// Best single period.
    pub best_period: f64,

    /// Worst single period.
    pub worst_period: f64,

    /// Share of periods with a positive return.
    pub win_rate: f64,
}

/// Portfolio-versus-benchmark metrics over aligned series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonMetrics {
    /// Sensitivity to benchmark returns.
    pub beta: f64,

    /// Annualized return not explained by beta.
    pub alpha: f64,

    /// Pearson correlation.
    pub correlation: f64,

    /// Squared correlation.
    pub r_squared: f64,

    /// Annualized volatility of active returns.
    pub tracking_error: f64,

    /// Annualized active return over tracking error.
    pub information_ratio: f64,
}

/// One drawdown episode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drawdown {
    /// First date below the previous peak.
    pub start: NaiveDate,

    /// Date of the lowest point.
    pub trough: NaiveDate,

    /// Recovery date, or the last date if not recovered.
    pub end: NaiveDate,

    /// Depth as a negative fraction (e.g. -0.25 for -25%).
    pub depth: f64,

    /// Calendar days from start to end, inclusive.
    pub days: i64,

    /// Whether the previous peak was regained.
    pub recovered: bool,
}

/// Compounded return of one calendar year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlyReturn {
    /// Calendar year.
    pub year: i32,

    /// Portfolio return for the year.
    pub portfolio: f64,

    /// Benchmark return for the year, if the benchmark has data that year.
    pub benchmark: Option<f64>,
}

/// Compute single-series metrics.
///
/// `risk_free_rate` is annual and converted to a per-period rate.
pub fn performance_metrics(
    series: &ReturnSeries,
    risk_free_rate: f64,
    periods_per_year: u32,
) -> PerformanceMetrics {
    let values = series.values();
    let ppy = f64::from(periods_per_year);
    let n = values.len();

    let total_return = compounded(values);
    let cagr = if n > 0 {
        (1.0 + total_return).powf(ppy / n as f64) - 1.0
    } else {
        0.0
    };

    let rf = per_period_rate(risk_free_rate, periods_per_year);
    let excess: Vec<f64> = values.iter().map(|r| r - rf).collect();

    let sd = std_dev(values);
    let volatility = sd * ppy.sqrt();
    let sharpe = ratio(mean(&excess), std_dev(&excess)) * ppy.sqrt();
    let sortino = ratio(mean(&excess), downside_deviation(&excess)) * ppy.sqrt();

    let episodes = drawdowns(series);
    let max_drawdown = episodes.iter().map(|d| d.depth).fold(0.0, f64::min);
    let max_drawdown_days = episodes.iter().map(|d| d.days).max().unwrap_or(0);
    let calmar = ratio(cagr, max_drawdown.abs());

    let best_period = values.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let worst_period = values.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let win_rate = if n > 0 {
        values.iter().filter(|r| **r > 0.0).count() as f64 / n as f64
    } else {
        0.0
    };

    PerformanceMetrics {
        periods: n,
        total_return,
        cagr,
        volatility,
        sharpe,
        sortino,
        max_drawdown,
        max_drawdown_days,
        calmar,
        best_period,
        worst_period,
        win_rate,
    }
}

/// Compute comparison metrics for two series of equal length.
///
/// Pairs are taken positionally; callers pass aligned series.
pub fn comparison_metrics(
    portfolio: &ReturnSeries,
    benchmark: &ReturnSeries,
    risk_free_rate: f64,
    periods_per_year: u32,
) -> ComparisonMetrics {
    let p = portfolio.values();
    let b = benchmark.values();
    let ppy = f64::from(periods_per_year);
    let rf = per_period_rate(risk_free_rate, periods_per_year);

    let cov = covariance(p, b);
    let var_b = covariance(b, b);
    let beta = ratio(cov, var_b);

    let alpha = ((mean(p) - rf) - beta * (mean(b) - rf)) * ppy;
    let correlation = ratio(cov, std_dev(p) * std_dev(b));

    let active: Vec<f64> = p.iter().zip(b).map(|(x, y)| x - y).collect();
    let active_sd = std_dev(&active);
    let tracking_error = active_sd * ppy.sqrt();
    let information_ratio = ratio(mean(&active), active_sd) * ppy.sqrt();

    ComparisonMetrics {
        beta,
        alpha,
        correlation,
        r_squared: correlation * correlation,
        tracking_error,
        information_ratio,
    }
}

/// All drawdown episodes in date order.
pub fn drawdowns(series: &ReturnSeries) -> Vec<Drawdown> {
    let mut episodes = Vec::new();
    let mut current: Option<Drawdown> = None;
    let mut wealth = 1.0;
    let mut peak = 1.0;

    for (date, r) in series.iter() {
        wealth *= 1.0 + r;

        if wealth >= peak {
            peak = wealth;
            if let Some(mut dd) = current.take() {
                dd.end = date;
                dd.recovered = true;
                dd.days = inclusive_days(dd.start, dd.end);
                episodes.push(dd);
            }
            continue;
        }

        let depth = wealth / peak - 1.0;
        match current.as_mut() {
            Some(dd) => {
                if depth < dd.depth {
                    dd.depth = depth;
                    dd.trough = date;
                }
                dd.end = date;
                dd.days = inclusive_days(dd.start, dd.end);
            }
            None => {
                current = Some(Drawdown {
                    start: date,
                    trough: date,
                    end: date,
                    depth,
                    days: 1,
                    recovered: false,
                });
            }
        }
    }

    episodes.extend(current);
    episodes
}

/// The `n` deepest drawdowns, deepest first.
pub fn top_drawdowns(series: &ReturnSeries, n: usize) -> Vec<Drawdown> {
    let mut episodes = drawdowns(series);
    episodes.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    episodes.truncate(n);
    episodes
}

/// Compounded return per calendar year.
pub fn yearly_returns(series: &ReturnSeries) -> BTreeMap<i32, f64> {
    let mut growth: BTreeMap<i32, f64> = BTreeMap::new();
    for (date, r) in series.iter() {
        *growth.entry(date.year()).or_insert(1.0) *= 1.0 + r;
    }
    growth.into_iter().map(|(y, g)| (y, g - 1.0)).collect()
}

/// Yearly returns of both series, keyed by the portfolio's years.
pub fn yearly_comparison(portfolio: &ReturnSeries, benchmark: &ReturnSeries) -> Vec<YearlyReturn> {
    let bench = yearly_returns(benchmark);
    yearly_returns(portfolio)
        .into_iter()
        .map(|(year, p)| YearlyReturn {
            year,
            portfolio: p,
            benchmark: bench.get(&year).copied(),
        })
        .collect()
}

fn compounded(values: &[f64]) -> f64 {
    values.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

fn per_period_rate(annual: f64, periods_per_year: u32) -> f64 {
    if annual == 0.0 || periods_per_year == 0 {
        0.0
    } else {
        (1.0 + annual).powf(1.0 / f64::from(periods_per_year)) - 1.0
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn covariance(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let (ma, mb) = (mean(&a[..n]), mean(&b[..n]));
    a[..n]
        .iter()
        .zip(&b[..n])
        .map(|(x, y)| (x - ma) * (y - mb))
        .sum::<f64>()
        / (n - 1) as f64
}

fn std_dev(values: &[f64]) -> f64 {
    covariance(values, values).sqrt()
}

fn downside_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().filter(|r| **r < 0.0).map(|r| r * r).sum();
    (sum_sq / values.len() as f64).sqrt()
}

fn ratio(num: f64, den: f64) -> f64 {
    if den.abs() < f64::EPSILON {
        0.0
    } else {
        num / den
    }
}

fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}
