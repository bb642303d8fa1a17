//! SVG line charts built from date-indexed frames.
//!
//! A [`LineChart`] reads a polars [`DataFrame`] holding one date column and
//! one `f64` column per series, and renders it as a standalone `<svg>`
//! element wrapped in a titled `<div>`. Nulls are gaps: the point is left out
//! of that series' polyline.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use thiserror::Error;

const WIDTH: i32 = 576;
const HEIGHT: i32 = 288;
const PADDING: f64 = 36.0;
const PALETTE: [&str; 4] = ["#348dc1", "#ff9933", "#8c8c8c", "#2ca02c"];

/// Errors that can occur while reading a frame into a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Polars error while reading a column.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Date column holds a null.
    #[error("Missing date in row {row}")]
    MissingDate {
        /// Zero-based row index
        row: usize,
    },

    /// Date column holds a value that is not an ISO date.
    #[error("Invalid date '{value}' in column '{column}'")]
    InvalidDate {
        /// Date column name
        column: String,
        /// Offending value
        value: String,
    },

    /// Frame has no columns besides the date column.
    #[error("Frame has no value columns")]
    NoSeries,
}

/// One named line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Legend label, taken from the column name
    pub label: String,
    /// Values aligned with the chart dates; `None` is a gap
    pub values: Vec<Option<f64>>,
}

/// A multi-series line chart over a shared date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    title: String,
    dates: Vec<NaiveDate>,
    series: Vec<ChartSeries>,
    percent_axis: bool,
    baseline: Option<f64>,
}

impl LineChart {
    /// Read a chart from `df`, using `date_column` as the x axis and every
    /// other column as a series.
    pub fn from_frame(df: &DataFrame, date_column: &str) -> Result<Self, ChartError> {
        let dates = read_dates(df, date_column)?;

        let mut series = Vec::new();
        for name in df.get_column_names() {
            if name.as_str() == date_column {
                continue;
            }
            let values = df
                .column(name.as_str())?
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect();
            series.push(ChartSeries {
                label: name.to_string(),
                values,
            });
        }

        if series.is_empty() {
            return Err(ChartError::NoSeries);
        }

        Ok(Self {
            title: String::new(),
            dates,
            series,
            percent_axis: false,
            baseline: None,
        })
    }

    /// Set the title shown above the chart.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Format y-axis labels as percentages.
    pub const fn percent_axis(mut self, percent: bool) -> Self {
        self.percent_axis = percent;
        self
    }

    /// Draw a dashed horizontal guide at `value`.
    pub const fn baseline(mut self, value: f64) -> Self {
        self.baseline = Some(value);
        self
    }

    /// Dates on the x axis.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Series in column order.
    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    /// Render as an HTML fragment containing the title and the SVG.
    pub fn to_svg(&self) -> String {
        let width = f64::from(WIDTH);
        let height = f64::from(HEIGHT);

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style>"#
        ));

        if let Some((min_v, max_v)) = self.extent() {
            let xs = x_positions(self.dates.len(), width);

            if let Some(guide) = self.baseline {
                let y = scale_value(guide, min_v, max_v, height);
                svg.push_str(&format!(
                    r##"<line x1="{PADDING:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#bbbbbb" stroke-width="1" stroke-dasharray="4 3" />"##,
                    x2 = width - PADDING,
                ));
            }

            self.draw_value_axis(&mut svg, min_v, max_v, height);

            for (idx, series) in self.series.iter().enumerate() {
                let color = PALETTE[idx % PALETTE.len()];
                for segment in segments(&series.values) {
                    let points = segment
                        .iter()
                        .map(|(i, v)| {
                            format!("{:.2},{:.2}", xs[*i], scale_value(*v, min_v, max_v, height))
                        })
                        .collect::<Vec<_>>()
                        .join(" ");
                    svg.push_str(&format!(
                        r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{points}" />"#
                    ));
                }
            }

            draw_time_axis(&mut svg, &self.dates, &xs, width, height);
            self.draw_legend(&mut svg);
        } else {
            svg.push_str(&format!(
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">No data</text>"#,
                x = width / 2.0,
                y = height / 2.0,
            ));
        }

        svg.push_str("</svg>");
        format!(
            r#"<div class="nt-plot"><div class="nt-plot-title">{title}</div>{svg}</div>"#,
            title = escape_html(&self.title),
        )
    }

    fn extent(&self) -> Option<(f64, f64)> {
        let mut min_v = f64::INFINITY;
        let mut max_v = f64::NEG_INFINITY;
        let values = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .chain(self.baseline.iter());
        for v in values {
            min_v = min_v.min(*v);
            max_v = max_v.max(*v);
        }
        if self.series.iter().all(|s| s.values.iter().all(Option::is_none)) {
            return None;
        }
        Some((min_v, max_v))
    }

    fn draw_value_axis(&self, svg: &mut String, min_v: f64, max_v: f64, height: f64) {
        let ticks = if (max_v - min_v).abs() < f64::EPSILON {
            vec![min_v]
        } else {
            (0..=4).map(|i| min_v + (max_v - min_v) * f64::from(i) / 4.0).collect()
        };
        for value in ticks {
            let label = if self.percent_axis {
                format!("{:.1}%", value * 100.0)
            } else {
                format!("{value:.2}")
            };
            svg.push_str(&format!(
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{label}</text>"#,
                x = PADDING - 4.0,
                y = scale_value(value, min_v, max_v, height) + 3.0,
            ));
        }
    }

    fn draw_legend(&self, svg: &mut String) {
        let x = PADDING + 10.0;
        let mut y = PADDING + 14.0;
        for (idx, series) in self.series.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            svg.push_str(&format!(
                r#"<line x1="{x:.2}" y1="{ly:.2}" x2="{x2:.2}" y2="{ly:.2}" stroke="{color}" stroke-width="1.5" />"#,
                ly = y - 4.0,
                x2 = x + 20.0,
            ));
            svg.push_str(&format!(
                r##"<text x="{tx:.2}" y="{y:.2}" text-anchor="start" fill="#333">{label}</text>"##,
                tx = x + 26.0,
                label = escape_html(&series.label),
            ));
            y += 16.0;
        }
    }
}

fn read_dates(df: &DataFrame, date_column: &str) -> Result<Vec<NaiveDate>, ChartError> {
    let column = df.column(date_column)?.cast(&DataType::String)?;
    column
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let value = value.ok_or(ChartError::MissingDate { row })?;
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ChartError::InvalidDate {
                column: date_column.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// Runs of consecutive present values as `(index, value)` pairs.
fn segments(values: &[Option<f64>]) -> Vec<Vec<(usize, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, v) in values.iter().enumerate() {
        match v {
            Some(v) => current.push((i, *v)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn scale_value(value: f64, min_v: f64, max_v: f64, height: f64) -> f64 {
    if (max_v - min_v).abs() < f64::EPSILON {
        return height / 2.0;
    }
    let inner_height = height - 2.0 * PADDING;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner_height
}

fn x_positions(len: usize, width: f64) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![width / 2.0],
        _ => {
            let inner_width = width - 2.0 * PADDING;
            let last = (len - 1) as f64;
            (0..len).map(|i| PADDING + inner_width * (i as f64 / last)).collect()
        }
    }
}

fn draw_time_axis(svg: &mut String, dates: &[NaiveDate], xs: &[f64], width: f64, height: f64) {
    let axis_y = height - PADDING + 5.0;
    svg.push_str(&format!(
        r##"<line x1="{PADDING:.2}" y1="{axis_y:.2}" x2="{x2:.2}" y2="{axis_y:.2}" stroke="#000" stroke-width="1" />"##,
        x2 = width - PADDING,
    ));

    // One label per month, or per day for short windows.
    let daily = dates
        .first()
        .zip(dates.last())
        .is_some_and(|(a, b)| a.year() == b.year() && a.month() == b.month());
    let mut last_key: Option<(i32, u32, u32)> = None;
    for (date, x) in dates.iter().zip(xs) {
        let key = (date.year(), date.month(), if daily { date.day() } else { 0 });
        if last_key == Some(key) {
            continue;
        }
        last_key = Some(key);
        let label = if daily {
            date.format("%m-%d").to_string()
        } else {
            date.format("%Y-%m").to_string()
        };
        svg.push_str(&format!(
            r##"<line x1="{x:.2}" y1="{PADDING:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="#dddddd" stroke-width="0.5" />"##,
            y2 = height - PADDING,
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            y = axis_y + 16.0,
        ));
    }
}

/// Escape text for inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
