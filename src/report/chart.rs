//! Chart payload construction.
//!
//! Builds the `labels` / `datasets` structures handed to a charting
//! surface: one bar chart of yearly totals and one multi-series line
//! chart of industry trends.

use crate::models::{ChartData, ChartDataset, IndustryYearMatrix, YearlyTotals};

/// Styling applied to generated chart payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Label of the single bar dataset.
    pub bar_label: String,
    pub bar_background: String,
    pub bar_border: String,
    pub bar_border_width: u32,
    /// Line colors, assigned by series index modulo length.
    pub palette: Vec<String>,
    /// Line curve smoothing.
    pub line_tension: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            bar_label: "Total Funding ($)".to_string(),
            bar_background: "rgba(153, 102, 255, 0.6)".to_string(),
            bar_border: "rgba(153, 102, 255, 1)".to_string(),
            bar_border_width: 1,
            palette: default_palette(),
            line_tension: 0.4,
        }
    }
}

impl From<&crate::config::ReportConfig> for ChartStyle {
    fn from(config: &crate::config::ReportConfig) -> Self {
        Self {
            bar_label: config.bar_label.clone(),
            bar_background: config.bar_background.clone(),
            bar_border: config.bar_border.clone(),
            bar_border_width: config.bar_border_width,
            palette: config.palette.clone(),
            line_tension: config.line_tension,
        }
    }
}

/// The stock line palette.
pub fn default_palette() -> Vec<String> {
    vec![
        "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#C9CBCF",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Color for the series at `index`, cycling through the palette.
pub fn palette_color(palette: &[String], index: usize) -> Option<&str> {
    if palette.is_empty() {
        None
    } else {
        Some(palette[index % palette.len()].as_str())
    }
}

/// Bar chart of total funding per year.
pub fn bar_chart(totals: &YearlyTotals, style: &ChartStyle) -> ChartData {
    let dataset = ChartDataset {
        background_color: Some(style.bar_background.clone()),
        border_color: Some(style.bar_border.clone()),
        border_width: Some(style.bar_border_width),
        ..ChartDataset::new(style.bar_label.clone(), totals.values())
    };

    ChartData {
        labels: year_labels(&totals.years()),
        datasets: vec![dataset],
    }
}

/// Line chart with one series per industry over the shared year axis.
pub fn line_chart(matrix: &IndustryYearMatrix, style: &ChartStyle) -> ChartData {
    let datasets = matrix
        .series
        .iter()
        .enumerate()
        .map(|(index, series)| ChartDataset {
            border_color: palette_color(&style.palette, index).map(String::from),
            fill: Some(false),
            tension: Some(style.line_tension),
            ..ChartDataset::new(series.industry.clone(), series.values.clone())
        })
        .collect();

    ChartData {
        labels: year_labels(&matrix.years),
        datasets,
    }
}

fn year_labels(years: &[i64]) -> Vec<String> {
    years.iter().map(|y| y.to_string()).collect()
}
