//! Single-page HTML dashboard.
//!
//! Sections are appended in display order. Once an error is recorded the
//! page is halted: the error is shown where it occurred and every later
//! section is ignored, so a failed stage never renders stale or partial
//! results below it.

use crate::chart::{LineChart, escape_html};
use crate::report::StatsReport;
use chrono::NaiveDate;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::debug;

const STYLE: &str = "body{font-family:Arial,sans-serif;margin:24px auto;max-width:960px;color:#222}\
h1{font-weight:normal}h2{font-size:1.2em;margin-top:2em}\
.nt-range{color:#555}.nt-error{background:#fdecea;border:1px solid #f5c2c0;color:#8a1f11;padding:8px 12px}\
.nt-plot-title{font-size:0.9em;color:#555;margin-bottom:4px}svg{width:100%;height:auto}\
table{border-collapse:collapse;margin:8px 0}td,th{padding:2px 12px;text-align:right}\
td:first-child,th:first-child{text-align:left}";

#[derive(Debug, Clone, PartialEq)]
enum Section {
    Range(NaiveDate, NaiveDate),
    Heading(String),
    Html(String),
    Error(String),
}

/// Dashboard page builder.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPage {
    title: String,
    sections: Vec<Section>,
    halted: bool,
}

impl DashboardPage {
    /// Create an empty page.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
            halted: false,
        }
    }

    /// Show the resolved date range.
    pub fn range(&mut self, start: NaiveDate, end: NaiveDate) -> &mut Self {
        self.push(Section::Range(start, end))
    }

    /// Add a chart under a heading.
    pub fn chart(&mut self, heading: impl Into<String>, chart: &LineChart) -> &mut Self {
        self.push(Section::Heading(heading.into()));
        self.push(Section::Html(chart.to_svg()))
    }

    /// Embed a statistics report under a heading.
    pub fn report(&mut self, heading: impl Into<String>, report: &StatsReport) -> &mut Self {
        self.push(Section::Heading(heading.into()));
        self.push(Section::Html(report.to_html()))
    }

    /// Show an error and halt the page.
    pub fn error(&mut self, message: impl Display) -> &mut Self {
        self.push(Section::Error(message.to_string()));
        self.halted = true;
        self
    }

    /// Returns `true` once an error has been recorded.
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    fn push(&mut self, section: Section) -> &mut Self {
        if self.halted {
            debug!("page halted, section dropped");
        } else {
            self.sections.push(section);
        }
        self
    }

    /// Render the full HTML document.
    pub fn render(&self) -> String {
        let title = escape_html(&self.title);
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">");
        html.push_str(&format!("<title>{title}</title><style>{STYLE}</style></head><body>"));
        html.push_str(&format!("<h1>{title}</h1>"));

        for section in &self.sections {
            match section {
                Section::Range(start, end) => html.push_str(&format!(
                    r#"<p class="nt-range">Data Range: {} to {}</p>"#,
                    start.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d")
                )),
                Section::Heading(text) => {
                    html.push_str(&format!("<h2>{}</h2>", escape_html(text)));
                }
                Section::Html(fragment) => html.push_str(fragment),
                Section::Error(message) => html.push_str(&format!(
                    r#"<div class="nt-error">{}</div>"#,
                    escape_html(message)
                )),
            }
        }

        html.push_str("</body></html>\n");
        html
    }

    /// Render and write the page to `path`.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportOptions;
    use navtrack_series::ReturnSeries;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn report() -> StatsReport {
        let dates = vec![date(2), date(3), date(4)];
        let p = ReturnSeries::new("Portfolio", dates.clone(), vec![0.01, -0.01, 0.02]).unwrap();
        let b = ReturnSeries::new("Nifty50", dates, vec![0.005, 0.0, 0.01]).unwrap();
        StatsReport::generate(&p, &b, &ReportOptions::default()).unwrap()
    }

    #[test]
    fn test_render_sections_in_order() {
        let mut page = DashboardPage::new("Portfolio Performance Analysis");
        page.range(date(2), date(4))
            .report("Statistics Report", &report());
        let html = page.render();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Portfolio Performance Analysis</h1>"));
        let range = html.find("Data Range: 2024-01-02 to 2024-01-04").unwrap();
        let stats = html.find("<h2>Statistics Report</h2>").unwrap();
        assert!(range < stats);
        assert!(!page.is_halted());
    }

    #[test]
    fn test_error_halts_later_sections() {
        let mut page = DashboardPage::new("Dashboard");
        page.range(date(2), date(4))
            .error("No overlap <between> series")
            .report("Statistics Report", &report());
        let html = page.render();

        assert!(page.is_halted());
        assert!(html.contains("Data Range"));
        assert!(html.contains(r#"<div class="nt-error">No overlap &lt;between&gt; series</div>"#));
        assert!(!html.contains("Statistics Report"));
    }

    #[test]
    fn test_write() {
        let path = std::env::temp_dir().join(format!("navtrack-page-{}.html", std::process::id()));
        let mut page = DashboardPage::new("Dashboard");
        page.error("fetch failed");
        page.write(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("fetch failed"));
        std::fs::remove_file(&path).ok();
    }
}
