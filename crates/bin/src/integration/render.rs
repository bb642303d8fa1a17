//! Dashboard layout.

use super::data_pipeline::DataPipelineError;
use navtrack_output::{DashboardPage, LineChart, ReportOptions, StatsReport};
use navtrack_series::PreparedSeries;
use navtrack_series::align::DATE_COLUMN;

/// Add the range, both charts and the statistics report to `page`.
///
/// Stops at the first failing section; the caller records the error on the
/// page so it appears in place of the missing sections.
pub(crate) fn fill_page(
    page: &mut DashboardPage,
    prepared: &PreparedSeries,
    options: &ReportOptions,
) -> Result<(), DataPipelineError> {
    let aligned = &prepared.aligned;
    let portfolio = aligned.portfolio();
    let benchmark = aligned.benchmark();

    page.range(aligned.start(), aligned.end());

    let returns = LineChart::from_frame(&aligned.to_frame()?, DATE_COLUMN)?
        .title("Daily returns")
        .percent_axis(true)
        .baseline(0.0);
    page.chart(
        format!("{} vs {} Returns", portfolio.name(), benchmark.name()),
        &returns,
    );

    let growth = LineChart::from_frame(&prepared.growth_frame()?, DATE_COLUMN)?
        .title("Growth of 1")
        .baseline(1.0);
    page.chart("Cumulative Growth", &growth);

    let report = StatsReport::generate(portfolio, benchmark, options)?;
    page.report("Statistics Report", &report);
    Ok(())
}
