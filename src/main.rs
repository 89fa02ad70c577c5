//! fundtrack - funding dataset aggregator
//!
//! A CLI tool that loads a funding JSON document, computes total
//! funding per year and funding per industry per year, and renders
//! a report or the chart payloads for a dashboard.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (load failure, malformed data in strict mode, config, IO)
//!   2 - Malformed records were skipped and --fail-on-skipped is set

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod records;
mod report;
mod source;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{Report, ReportMetadata};
use records::DecodedRecords;
use report::ChartStyle;
use source::{DataSource, FetchOptions};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Message shown to the user when the dataset cannot be loaded.
const LOAD_FAILURE_MESSAGE: &str = "Failed to load funding data. Please try again later.";

#[tokio::main]
async fn main() -> Result<()> {
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

    // Config is loaded before logging so `[general] verbose` can raise the level
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(config.log_level(&args));

    info!("fundtrack v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Effective config: {:?}", config);

    let outcome = run(&args, config).await;
    if let Err(ref e) = outcome {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
    }
    std::process::exit(exit_code(&outcome));
}

/// Map the outcome of [`run`] to the process exit code.
fn exit_code(outcome: &Result<i32>) -> i32 {
    match outcome {
        Ok(code) => *code,
        Err(_) => 1,
    }
}

/// Handle --init-config: generate a default .fundtrack.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the data source, industry order and chart styling.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete load, aggregate and render workflow with an already
/// merged config. Returns exit code (0 or 2).
async fn run(args: &Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    let data_source = DataSource::parse(&config.source.location);
    let fetch_options = FetchOptions {
        timeout_seconds: config.source.timeout_seconds,
        show_progress: !args.quiet && !args.stdout,
    };

    // Step 1: Load the dataset (single attempt)
    status(args, &format!("📥 Loading funding data: {}", data_source));
    let document = match source::fetch_document(&data_source, &fetch_options).await {
        Ok(document) => document,
        Err(e) => {
            error!("Loading {} failed: {:#}", data_source, e);
            return Err(e.context(LOAD_FAILURE_MESSAGE));
        }
    };

    // Step 2: Decode records
    let policy = config.aggregation.on_malformed;
    let decoded = match records::decode_records(&document, policy) {
        Ok(decoded) => decoded,
        Err(e) => {
            let index = e.index();
            let err = anyhow::Error::new(e)
                .context(format!("Invalid funding data in {}", data_source));
            return Err(match index {
                Some(index) => {
                    error!("Malformed record at index {} (policy: {})", index, policy);
                    err
                }
                // The document as a whole is unusable
                None => {
                    error!("Loading {} failed: {:#}", data_source, err);
                    err.context(LOAD_FAILURE_MESSAGE)
                }
            });
        }
    };

    if !decoded.skipped.is_empty() {
        warn!(
            "Skipped {} of {} records as malformed",
            decoded.skipped.len(),
            decoded.total_seen()
        );
    }
    info!("Decoded {} funding records", decoded.records.len());

    // Step 3: Aggregate and build the report
    status(args, "🧮 Aggregating funding...");
    let mut report = build_report(&data_source, decoded, &config);
    report.metadata.duration_seconds = start_time.elapsed().as_secs_f64();

    // Step 4: Render and save
    let output = match config.general.format {
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Chart => report::generate_chart_payload(&report)?,
    };

    if args.stdout {
        println!("{}", output);
    } else {
        std::fs::write(&config.general.output, &output)
            .with_context(|| format!("Failed to write report to {}", config.general.output))?;
    }

    // Print summary
    let metadata = &report.metadata;
    status(args, "\n📊 Funding Summary:");
    status(args, &format!("   Records aggregated: {}", metadata.records_loaded));
    if metadata.records_skipped > 0 {
        status(args, &format!("   ⚠️  Records skipped: {}", metadata.records_skipped));
    }
    status(
        args,
        &format!(
            "   Years: {} | Industries: {}",
            metadata.years, metadata.industries
        ),
    );
    status(
        args,
        &format!(
            "   Total funding: {}",
            report::generator::format_amount(metadata.total_funding)
        ),
    );
    if !args.stdout {
        status(
            args,
            &format!("\n✅ Report saved to: {}", config.general.output),
        );
    }

    if args.fail_on_skipped && metadata.records_skipped > 0 {
        eprintln!(
            "\n⛔ {} malformed record(s) skipped. Failing (exit code 2).",
            metadata.records_skipped
        );
        return Ok(2);
    }

    Ok(0)
}

/// Aggregate decoded records into a complete report.
fn build_report(data_source: &DataSource, decoded: DecodedRecords, config: &Config) -> Report {
    let DecodedRecords { records, skipped } = decoded;
    let order = config.aggregation.industry_order;

    let yearly_totals = analysis::compute_yearly_totals(&records);
    let industry_matrix = analysis::compute_industry_year_matrix(&records, order);

    let style = ChartStyle::from(&config.report);
    let bar_chart = report::bar_chart(&yearly_totals, &style);
    let line_chart = report::line_chart(&industry_matrix, &style);

    let metadata = ReportMetadata {
        source: data_source.to_string(),
        generated_at: Utc::now(),
        records_loaded: records.len(),
        records_skipped: skipped.len(),
        years: yearly_totals.len(),
        industries: industry_matrix.series.len(),
        total_funding: analysis::grand_total(&yearly_totals),
        industry_order: order,
        duration_seconds: 0.0,
    };

    Report {
        title: config.report.title.clone(),
        metadata,
        industry_ranking: analysis::top_industries(&industry_matrix, config.report.top_industries),
        yearly_totals,
        industry_matrix,
        bar_chart,
        line_chart,
        skipped,
    }
}

/// Print a progress line unless output is suppressed.
fn status(args: &Args, line: &str) {
    // Keep stdout clean when the report itself goes there
    if args.quiet || args.stdout {
        return;
    }
    println!("{}", line);
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
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
