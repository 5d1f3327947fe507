//! Wedstrijd Report - gymnastics competition results to HTML
//!
//! A CLI tool that reads the competition sheet of a results workbook,
//! ranks every competitor within their category and writes a
//! self-contained HTML report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable workbook, missing sheet, write failure, etc.)
//!   2 - Usage error (missing input argument, unknown flag)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod workbook;

use analysis::ColumnMap;
use anyhow::{bail, Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use models::AggregateStats;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use workbook::{ExcelWorkbook, SheetSource, COMPETITION_SHEET};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args)?;

    info!("Wedstrijd Report v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_report(args) {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .wedstrijd.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        bail!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to change the output path or report headings.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// What a successful run produced.
#[derive(Debug, Clone)]
struct RunSummary {
    output: PathBuf,
    categories: usize,
    competitors: usize,
    stats: AggregateStats,
}

/// Run the complete workbook-to-report pipeline.
fn run_report(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let input = args
        .input
        .clone()
        .context("No input workbook given")?;

    if !args.quiet {
        println!("📥 Reading workbook: {}", input.display());
    }
    let mut workbook = ExcelWorkbook::open(&input)?;

    let output = PathBuf::from(&config.general.output);
    let summary = generate_report_file(&mut workbook, &config, &output)?;

    if !args.quiet {
        println!("\n📊 Report Summary:");
        println!("   Categories: {}", summary.categories);
        println!("   Competitors: {}", summary.competitors);
        println!(
            "   Rows: {} read | {} used | {} skipped",
            summary.stats.rows_scanned, summary.stats.rows_aggregated, summary.stats.rows_skipped
        );
        println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
        println!(
            "\n✅ Report complete! Saved to: {}",
            summary.output.display()
        );
    }

    Ok(())
}

/// Read the competition sheet, rank it and write the report to `output`.
///
/// The report is built entirely in memory first, so nothing is written when
/// the sheet is missing or unreadable.
fn generate_report_file<S: SheetSource>(
    source: &mut S,
    config: &Config,
    output: &Path,
) -> Result<RunSummary> {
    let rows = source.require_sheet(COMPETITION_SHEET)?;

    let columns = ColumnMap::default();
    let standings = analysis::aggregate(&rows, &columns);
    let stats = analysis::row_stats(&rows, &columns);

    if standings.is_empty() {
        warn!(
            "No competitors found in sheet '{}'; the report will be empty",
            COMPETITION_SHEET
        );
    }

    let content = report::generate_html_report(&standings, &config.report);
    report::write_report(&content, output)?;
    info!("Report written to {}", output.display());

    Ok(RunSummary {
        output: output.to_path_buf(),
        categories: standings.len(),
        competitors: standings.competitor_count(),
        stats,
    })
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
