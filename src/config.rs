//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.fundtrack.toml` files.

use crate::cli::OutputFormat;
use crate::models::IndustryOrder;
use crate::records::RecordPolicy;
use crate::report::chart::default_palette;
use crate::source::DEFAULT_LOCATION;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".fundtrack.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
            format: OutputFormat::default(),
        }
    }
}

fn default_output() -> String {
    "funding_report.md".to_string()
}

/// Funding data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// File path or http(s) URL of the funding JSON document.
    #[serde(default = "default_location")]
    pub location: String,

    /// Request timeout in seconds for URL sources.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Aggregation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Ordering of industry series.
    #[serde(default)]
    pub industry_order: IndustryOrder,

    /// Handling of malformed records.
    #[serde(default)]
    pub on_malformed: RecordPolicy,
}

/// Report and chart styling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Label of the bar chart dataset.
    #[serde(default = "default_bar_label")]
    pub bar_label: String,

    /// Bar fill color.
    #[serde(default = "default_bar_background")]
    pub bar_background: String,

    /// Bar border color.
    #[serde(default = "default_bar_border")]
    pub bar_border: String,

    /// Bar border width in pixels.
    #[serde(default = "default_bar_border_width")]
    pub bar_border_width: u32,

    /// Line colors, cycled per industry.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Line curve smoothing.
    #[serde(default = "default_line_tension")]
    pub line_tension: f64,

    /// Number of industries listed in the ranking.
    #[serde(default = "default_top_industries")]
    pub top_industries: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            bar_label: default_bar_label(),
            bar_background: default_bar_background(),
            bar_border: default_bar_border(),
            bar_border_width: default_bar_border_width(),
            palette: default_palette(),
            line_tension: default_line_tension(),
            top_industries: default_top_industries(),
        }
    }
}

fn default_title() -> String {
    "Funding Tracker".to_string()
}

fn default_bar_label() -> String {
    "Total Funding ($)".to_string()
}

fn default_bar_background() -> String {
    "rgba(153, 102, 255, 0.6)".to_string()
}

fn default_bar_border() -> String {
    "rgba(153, 102, 255, 1)".to_string()
}

fn default_bar_border_width() -> u32 {
    1
}

fn default_line_tension() -> f64 {
    0.4
}

fn default_top_industries() -> usize {
    5
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.fundtrack.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref source) = args.source {
            self.source.location = source.clone();
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }

        if let Some(order) = args.industry_order {
            self.aggregation.industry_order = order;
        }
        if args.strict {
            self.aggregation.on_malformed = RecordPolicy::Strict;
        } else if args.skip_malformed {
            self.aggregation.on_malformed = RecordPolicy::Skip;
        }

        if let Some(top) = args.top {
            self.report.top_industries = top;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level for this run. `--quiet` wins; otherwise verbose from
    /// either the CLI or `[general]` selects DEBUG.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        if !args.quiet && self.general.verbose {
            tracing::Level::DEBUG
        } else {
            args.log_level()
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.location, "funding.json");
        assert_eq!(config.aggregation.industry_order, IndustryOrder::FirstAppearance);
        assert_eq!(config.aggregation.on_malformed, RecordPolicy::Skip);
        assert_eq!(config.report.palette.len(), 7);
        assert_eq!(config.report.bar_label, "Total Funding ($)");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r##"
[general]
output = "custom_report.json"
format = "json"

[source]
location = "https://example.com/funding.json"
timeout_seconds = 5

[aggregation]
industry_order = "alphabetical"
on_malformed = "strict"

[report]
title = "Seed Rounds"
palette = ["#111111", "#222222"]
"##;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.json");
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.source.location, "https://example.com/funding.json");
        assert_eq!(config.source.timeout_seconds, 5);
        assert_eq!(config.aggregation.industry_order, IndustryOrder::Alphabetical);
        assert_eq!(config.aggregation.on_malformed, RecordPolicy::Strict);
        assert_eq!(config.report.title, "Seed Rounds");
        assert_eq!(config.report.palette, vec!["#111111", "#222222"]);
        assert_eq!(config.report.line_tension, 0.4);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[aggregation]"));
        assert!(toml_str.contains("[report]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.report.palette, default_palette());
    }

    #[test]
    fn test_load_from_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(temp_dir.path()).unwrap().is_none());

        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[source]\nlocation = \"data.json\"\n",
        )
        .unwrap();

        let config = Config::load_from_dir(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.source.location, "data.json");
        assert_eq!(config.source.timeout_seconds, 30);
    }

    #[test]
    fn test_merge_with_args_overrides_only_given_values() {
        let mut config = Config::default();
        config.source.location = "from_config.json".to_string();
        config.aggregation.industry_order = IndustryOrder::Alphabetical;

        let args = crate::cli::Args::parse_from(["fundtrack", "--strict", "--format", "chart"]);
        config.merge_with_args(&args);

        assert_eq!(config.source.location, "from_config.json");
        assert_eq!(config.aggregation.industry_order, IndustryOrder::Alphabetical);
        assert_eq!(config.aggregation.on_malformed, RecordPolicy::Strict);
        assert_eq!(config.general.format, OutputFormat::Chart);
    }

    #[test]
    fn test_verbose_from_config_file_sets_debug_level() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fundtrack.toml");
        std::fs::write(&path, "[general]\nverbose = true\n").unwrap();

        let args = crate::cli::Args::parse_from([
            "fundtrack",
            "--config",
            path.to_str().unwrap(),
        ]);
        let mut config = Config::load(&path).unwrap();
        config.merge_with_args(&args);

        assert_eq!(config.log_level(&args), tracing::Level::DEBUG);
    }

    #[test]
    fn test_quiet_overrides_verbose_config() {
        let mut config = Config::default();
        config.general.verbose = true;

        let args = crate::cli::Args::parse_from(["fundtrack", "--quiet"]);
        assert_eq!(config.log_level(&args), tracing::Level::ERROR);

        let args = crate::cli::Args::parse_from(["fundtrack"]);
        assert_eq!(Config::default().log_level(&args), tracing::Level::INFO);
    }
}
