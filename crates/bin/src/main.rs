//! navtrack CLI binary.
//!
//! Fetches a published NAV spreadsheet, compares it with the benchmark
//! column, and writes an HTML dashboard, a terminal summary or an export.

mod integration;

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use integration::config_manager::load_config;
use integration::data_pipeline::{DataPipeline, DataPipelineError, resolve_source};
use integration::render::fill_page;
use navtrack_data::{FetchConfig, Source};
use navtrack_output::{DashboardPage, ExportFormat, Exporter, ReturnsExport, StatsReport};
use navtrack_series::PreparedSeries;
use serde_json::json;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "navtrack")]
#[command(about = "navtrack: portfolio NAV analytics against a benchmark", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the HTML dashboard
    Report {
        /// CSV source: URL or file path
        #[arg(long)]
        source: Option<String>,

        /// Output HTML file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Disable caching (always fetch fresh data)
        #[arg(long)]
        no_cache: bool,

        /// Force refresh cached data
        #[arg(long)]
        refresh: bool,
    },

    /// Print the date range and performance statistics
    Summary {
        /// CSV source: URL or file path
        #[arg(long)]
        source: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,
    },

    /// Export aligned returns
    Export {
        /// CSV source: URL or file path
        #[arg(long)]
        source: Option<String>,

        /// Output file
        #[arg(long)]
        output: PathBuf,

        /// Output format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    /// Date range and an ASCII statistics table
    Text,
    /// The statistics report as JSON
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr; `-v` forces debug, otherwise `RUST_LOG` or warnings only.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_path) = load_config(cli.config.as_deref())?;
    let config_label = config_path.display().to_string();

    match cli.command {
        Commands::Report {
            source,
            output,
            title,
            no_cache,
            refresh,
        } => {
            let source = resolve_source(source.as_deref(), &config, &config_label)?;
            let output = output.unwrap_or_else(|| config.report.output.clone());
            let fetch = FetchConfig {
                use_cache: !no_cache,
                force_refresh: refresh,
            };
            let mut options = config.report_options();
            if let Some(title) = title {
                options.title = title;
            }

            let mut pipeline = DataPipeline::new(config)?;
            let mut page = DashboardPage::new(options.title.clone());

            let result = match load(&mut pipeline, &source, fetch).await {
                Ok(prepared) => fill_page(&mut page, &prepared, &options),
                Err(e) => Err(e),
            };
            if let Err(e) = &result {
                page.error(e);
            }

            page.write(&output)?;
            info!(path = %output.display(), "dashboard written");
            result?;
            println!("Dashboard written to {}", output.display());
        }
        Commands::Summary { source, format } => {
            let source = resolve_source(source.as_deref(), &config, &config_label)?;
            let options = config.report_options();
            let mut pipeline = DataPipeline::new(config)?;

            let prepared = load(&mut pipeline, &source, FetchConfig::default()).await?;
            let aligned = &prepared.aligned;
            let report = StatsReport::generate(aligned.portfolio(), aligned.benchmark(), &options)
                .map_err(DataPipelineError::from)?;

            if format == SummaryFormat::Json {
                let output = json!({
                    "source": source.to_string(),
                    "observations": prepared.observations.len(),
                    "report": report,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "Data Range: {} to {}",
                    aligned.start().format("%Y-%m-%d"),
                    aligned.end().format("%Y-%m-%d")
                );
                println!("Observations: {}", prepared.observations.len());
                print!("{}", report.to_ascii_table());
            }
        }
        Commands::Export {
            source,
            output,
            format,
        } => {
            let format: ExportFormat = format.parse().map_err(DataPipelineError::from)?;
            let source = resolve_source(source.as_deref(), &config, &config_label)?;
            let mut pipeline = DataPipeline::new(config)?;

            let prepared = load(&mut pipeline, &source, FetchConfig::default()).await?;
            let export = ReturnsExport::from_aligned(&prepared.aligned);
            export
                .export_to_file(&output, format)
                .map_err(DataPipelineError::from)?;
            println!(
                "Exported {} periods ({} to {}) to {}",
                export.records.len(),
                export.start,
                export.end,
                output.display()
            );
        }
        Commands::Config => {
            println!("# {}", config_label);
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// Fetch with a spinner, then run the series stages.
async fn load(
    pipeline: &mut DataPipeline,
    source: &Source,
    fetch: FetchConfig,
) -> Result<PreparedSeries, DataPipelineError> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = pipeline.run(source, fetch, Some(&pb)).await;
    if let Err(e) = &result {
        error!(error = %e, source = %source, "pipeline failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_format() {
        let cli = Cli::try_parse_from(["navtrack", "summary", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Summary {
                format: SummaryFormat::Json,
                ..
            }
        ));

        let cli = Cli::try_parse_from(["navtrack", "summary"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Summary {
                format: SummaryFormat::Text,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_summary_format_rejected() {
        assert!(Cli::try_parse_from(["navtrack", "summary", "--format", "xml"]).is_err());
    }
}
