//! Funding dataset loading.
//!
//! This module resolves where the funding document lives and loads it
//! in a single asynchronous attempt, either from a local file or over
//! HTTP(S) using reqwest.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default dataset location, relative to the working directory.
pub const DEFAULT_LOCATION: &str = "funding.json";

/// Where the funding document is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local JSON file.
    File(PathBuf),
    /// Remote JSON document fetched with a GET request.
    Url(String),
}

impl DataSource {
    /// Interpret a location string: `http://` and `https://` prefixes
    /// are URLs, anything else is a file path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::File(PathBuf::from(DEFAULT_LOCATION))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Options for loading the dataset.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request timeout in seconds (URL sources only).
    pub timeout_seconds: u64,
    /// Whether to show a spinner while loading.
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// Load and parse the funding document. There is exactly one attempt.
pub async fn fetch_document(source: &DataSource, options: &FetchOptions) -> Result<Value> {
    info!("Loading funding data from: {}", source);

    let spinner = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid spinner template")?,
        );
        pb.set_message(format!("Loading {}", source));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = match source {
        DataSource::File(path) => read_file(path).await,
        DataSource::Url(url) => fetch_url(url, options.timeout_seconds).await,
    };

    if let Some(pb) = spinner {
        match &result {
            Ok(_) => pb.finish_with_message("Funding data loaded"),
            Err(_) => pb.abandon_with_message("Failed to load funding data"),
        }
    }

    result
}

async fn read_file(path: &Path) -> Result<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read funding data file: {}", path.display()))?;
    debug!("Read {} bytes from {}", content.len(), path.display());

    serde_json::from_str(&content)
        .with_context(|| format!("Funding data file is not valid JSON: {}", path.display()))
}

async fn fetch_url(url: &str, timeout_seconds: u64) -> Result<Value> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            anyhow::anyhow!("Request timed out after {}s", timeout_seconds)
        } else if e.is_connect() {
            anyhow::anyhow!("Cannot connect to {}", url)
        } else {
            anyhow::anyhow!("Failed to send request: {}", e)
        }
    })?;

    if !response.status().is_success() {
        return Err(anyhow::anyhow!(
            "Failed to fetch funding data: HTTP {}",
            response.status()
        ));
    }

    response
        .json::<Value>()
        .await
        .context("Funding data response is not valid JSON")
}
