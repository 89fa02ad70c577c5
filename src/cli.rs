//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::IndustryOrder;
use crate::source::DataSource;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// fundtrack - funding dataset aggregator
///
/// Loads a funding JSON document (an array of {year, industry, amount}
/// records), computes total funding per year and funding per industry
/// per year, and writes a report or the chart payloads.
///
/// Examples:
///   fundtrack
///   fundtrack --source data/funding.json --format json -o report.json
///   fundtrack --source https://example.com/funding.json --format chart --stdout
///   fundtrack --industry-order alphabetical --strict
///   fundtrack --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Funding data location (file path or http(s) URL)
    ///
    /// Defaults to the config file setting, or funding.json.
    #[arg(short, long, value_name = "PATH|URL")]
    pub source: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the report to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Output format (markdown, json, chart)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Ordering of industry series
    ///
    /// first-appearance keeps input order; alphabetical is stable across
    /// reordered inputs.
    #[arg(long, value_name = "ORDER")]
    pub industry_order: Option<IndustryOrder>,

    /// Fail on the first malformed record
    #[arg(long, conflicts_with = "skip_malformed")]
    pub strict: bool,

    /// Skip malformed records and report how many were dropped
    #[arg(long, conflicts_with = "strict")]
    pub skip_malformed: bool,

    /// Number of industries listed in the ranking
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Request timeout in seconds for URL sources
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .fundtrack.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 if any malformed records were skipped
    #[arg(long)]
    pub fail_on_skipped: bool,

    /// Generate a default .fundtrack.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown report (default)
    #[default]
    Markdown,
    /// Full JSON report
    Json,
    /// Bar and line chart payloads only
    Chart,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }

        if let Some(ref source) = self.source {
            if source.trim().is_empty() {
                return Err("Source must not be empty".to_string());
            }

            match DataSource::parse(source) {
                DataSource::Url(_) => {}
                DataSource::File(path) => {
                    if source.contains("://") {
                        return Err(format!(
                            "Unsupported source scheme (expected http:// or https://): {}",
                            source
                        ));
                    }
                    if path.is_dir() {
                        return Err(format!("Source path is a directory: {}", path.display()));
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            source: Some("https://example.com/funding.json".to_string()),
            output: None,
            stdout: false,
            format: None,
            industry_order: None,
            strict: false,
            skip_malformed: false,
            top: None,
            timeout: None,
            config: None,
            verbose: false,
            quiet: false,
            fail_on_skipped: false,
            init_config: false,
        }
    }

    #[test]
    fn test_valid_args() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_unsupported_scheme() {
        let mut args = make_args();
        args.source = Some("ftp://example.com/funding.json".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_directory_source() {
        let mut args = make_args();
        args.source = Some(std::env::temp_dir().display().to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.top = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "fundtrack",
            "--source",
            "data.json",
            "--format",
            "json",
            "--industry-order",
            "alphabetical",
            "--fail-on-skipped",
        ]);

        assert_eq!(args.source.as_deref(), Some("data.json"));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.industry_order, Some(IndustryOrder::Alphabetical));
        assert!(args.fail_on_skipped);
    }

    #[test]
    fn test_strict_conflicts_with_skip() {
        let result = Args::try_parse_from(["fundtrack", "--strict", "--skip-malformed"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
