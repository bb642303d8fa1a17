//! Rendering a full dashboard from spreadsheet text.

use navtrack_data::{ColumnMap, RawTable};
use navtrack_output::{
    DashboardPage, ExportFormat, Exporter, LineChart, ReportOptions, ReturnsExport, StatsReport,
};
use navtrack_series::{PipelineConfig, prepare};

const SHEET: &str = "\
Date,NAV,Nifty50 Change %
01-Jan-24,100,1%
02-Jan-24,102,0.5%
03-Jan-24,101,-0.4%
04-Jan-24,103.5,0.9%
05-Jan-24,102.9,
08-Jan-24,104.2,0.3%
Portfolio Value,104.2,
Absolute Gain,4.2,
";

fn prepared() -> navtrack_series::PreparedSeries {
    let rows = RawTable::from_bytes(SHEET.as_bytes())
        .unwrap()
        .rows(&ColumnMap::default())
        .unwrap();
    prepare(rows, &PipelineConfig::default()).unwrap()
}

#[test]
fn test_full_page() {
    let prepared = prepared();
    let aligned = &prepared.aligned;

    let returns = LineChart::from_frame(&aligned.to_frame().unwrap(), "date")
        .unwrap()
        .percent_axis(true)
        .baseline(0.0);
    let growth = LineChart::from_frame(&prepared.growth_frame().unwrap(), "date")
        .unwrap()
        .baseline(1.0);
    let report = StatsReport::generate(
        aligned.portfolio(),
        aligned.benchmark(),
        &ReportOptions::default(),
    )
    .unwrap();

    let mut page = DashboardPage::new("Portfolio Performance Analysis");
    page.range(aligned.start(), aligned.end())
        .chart("Portfolio vs Nifty50 Returns", &returns)
        .chart("Cumulative Growth", &growth)
        .report("Statistics Report", &report);
    let html = page.render();

    assert!(html.contains("Data Range: 2024-01-02 to 2024-01-08"));
    assert_eq!(html.matches("<svg").count(), 2);
    assert!(html.contains("<h2>Cumulative Growth</h2>"));
    assert!(html.contains(r#"<section class="nt-report">"#));
    assert!(!page.is_halted());
    assert!(!html.contains(r#"<div class="nt-error">"#));
}

#[test]
fn test_growth_chart_has_gap_for_missing_change() {
    let prepared = prepared();
    let chart = LineChart::from_frame(&prepared.growth_frame().unwrap(), "date").unwrap();

    // 01-Jan is the base, 05-Jan has no benchmark change.
    assert_eq!(chart.dates().len(), 6);
    let benchmark = &chart.series()[1];
    assert_eq!(benchmark.label, "Nifty50");
    assert_eq!(benchmark.values[4], None);
    assert!(benchmark.values.iter().filter(|v| v.is_some()).count() == 5);
}

#[test]
fn test_report_on_single_period_renders_error() {
    let sheet = "Date,NAV,Nifty50 Change %\n01-Jan-24,100,1%\n02-Jan-24,102,0.5%\n";
    let rows = RawTable::from_bytes(sheet.as_bytes())
        .unwrap()
        .rows(&ColumnMap::default())
        .unwrap();
    let prepared = prepare(rows, &PipelineConfig::default()).unwrap();
    let aligned = &prepared.aligned;

    let mut page = DashboardPage::new("Portfolio Performance Analysis");
    page.range(aligned.start(), aligned.end());
    match StatsReport::generate(
        aligned.portfolio(),
        aligned.benchmark(),
        &ReportOptions::default(),
    ) {
        Ok(report) => {
            page.report("Statistics Report", &report);
        }
        Err(e) => {
            page.error(format!("Error generating statistics report: {e}"));
        }
    }

    let html = page.render();
    assert!(page.is_halted());
    assert!(html.contains("Insufficient data"));
}

#[test]
fn test_export_matches_aligned_dates() {
    let prepared = prepared();
    let export = ReturnsExport::from_aligned(&prepared.aligned);
    let csv = export.export_to_string(ExportFormat::Csv).unwrap();

    // 05-Jan has no benchmark change and is dropped from both sides.
    assert_eq!(csv.lines().count(), 1 + 4);
    assert!(!csv.contains("2024-01-05"));
}
