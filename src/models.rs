//! Data models for the funding tracker.
//!
//! This module contains the core data structures used throughout
//! the application: input records, aggregate views, chart payloads
//! and the final report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One observation of capital raised by an industry in a given year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRecord {
    /// Calendar year of the observation.
    pub year: i64,
    /// Industry name, used verbatim as the series label.
    pub industry: String,
    /// Amount raised.
    pub amount: f64,
}

impl FundingRecord {
    /// Creates a new funding record.
    pub fn new(year: i64, industry: impl Into<String>, amount: f64) -> Self {
        Self {
            year,
            industry: industry.into(),
            amount,
        }
    }
}

/// Summed funding per year, iterated in ascending year order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlyTotals {
    totals: BTreeMap<i64, f64>,
}

impl YearlyTotals {
    /// Adds `amount` to the running total for `year`.
    pub fn add(&mut self, year: i64, amount: f64) {
        *self.totals.entry(year).or_insert(0.0) += amount;
    }

    /// Total for a single year, if any record carried it.
    pub fn get(&self, year: i64) -> Option<f64> {
        self.totals.get(&year).copied()
    }

    /// Years in ascending order.
    pub fn years(&self) -> Vec<i64> {
        self.totals.keys().copied().collect()
    }

    /// Totals aligned to [`YearlyTotals::years`].
    pub fn values(&self) -> Vec<f64> {
        self.totals.values().copied().collect()
    }

    /// Iterate `(year, total)` pairs in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.totals.iter().map(|(year, total)| (*year, *total))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Ordering of industries in the industry×year matrix.
///
/// `FirstAppearance` keeps the order in which each industry first occurs
/// in the input, which is stable but depends on input order.
/// `Alphabetical` sorts by name and gives the same output for any
/// permutation of the same records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum IndustryOrder {
    #[default]
    FirstAppearance,
    Alphabetical,
}

impl fmt::Display for IndustryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndustryOrder::FirstAppearance => write!(f, "first-appearance"),
            IndustryOrder::Alphabetical => write!(f, "alphabetical"),
        }
    }
}

/// One industry's funding, aligned to the matrix's shared year axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustrySeries {
    /// Industry name.
    pub industry: String,
    /// One value per entry of [`IndustryYearMatrix::years`]; zero where
    /// the industry has no record for that year.
    pub values: Vec<f64>,
}

impl IndustrySeries {
    /// Sum across all years.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Funding by industry and year over a common sorted year axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryYearMatrix {
    /// Sorted union of all years present in the input.
    pub years: Vec<i64>,
    /// One series per industry, each of length `years.len()`.
    pub series: Vec<IndustrySeries>,
}

impl IndustryYearMatrix {
    /// Looks up a series by industry name.
    #[allow(dead_code)] // Lookup utility
    pub fn series_for(&self, industry: &str) -> Option<&IndustrySeries> {
        self.series.iter().find(|s| s.industry == industry)
    }

    /// Value for an (industry, year) pair; zero-filled cells report `0.0`.
    #[allow(dead_code)] // Lookup utility
    pub fn value(&self, industry: &str, year: i64) -> Option<f64> {
        let column = self.years.iter().position(|y| *y == year)?;
        self.series_for(industry).map(|s| s.values[column])
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Total funding attributed to one industry across all years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryTotal {
    pub industry: String,
    pub total: f64,
}

/// A single labeled series in a chart payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

impl ChartDataset {
    /// Creates an unstyled dataset.
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
            background_color: None,
            border_color: None,
            border_width: None,
            fill: None,
            tension: None,
        }
    }
}

/// Chart payload: a shared label axis and the datasets plotted over it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// A record that was dropped during decoding, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position of the record in the source array.
    pub index: usize,
    /// Human-readable reason.
    pub reason: String,
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Location the dataset was loaded from.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records that were aggregated.
    pub records_loaded: usize,
    /// Number of malformed records that were skipped.
    pub records_skipped: usize,
    /// Number of distinct years.
    pub years: usize,
    /// Number of distinct industries.
    pub industries: usize,
    /// Sum of every aggregated amount.
    pub total_funding: f64,
    /// Ordering used for industry series.
    pub industry_order: IndustryOrder,
    /// Duration of load plus aggregation in seconds.
    pub duration_seconds: f64,
}

/// The complete funding report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report title.
    pub title: String,
    pub metadata: ReportMetadata,
    /// Total funding per year.
    pub yearly_totals: YearlyTotals,
    /// Funding per industry per year.
    pub industry_matrix: IndustryYearMatrix,
    /// Bar chart payload (total funding by year).
    pub bar_chart: ChartData,
    /// Line chart payload (funding trends by industry).
    pub line_chart: ChartData,
    /// Industries ranked by total funding, largest first.
    pub industry_ranking: Vec<IndustryTotal>,
    /// Records dropped during decoding.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<SkippedRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yearly_totals_sorted_iteration() {
        let mut totals = YearlyTotals::default();
        totals.add(2022, 5.0);
        totals.add(2019, 1.0);
        totals.add(2022, 2.5);

        assert_eq!(totals.years(), vec![2019, 2022]);
        assert_eq!(totals.values(), vec![1.0, 7.5]);
        assert_eq!(totals.get(2022), Some(7.5));
        assert_eq!(totals.get(2000), None);
    }

    #[test]
    fn test_yearly_totals_serialize_as_map() {
        let mut totals = YearlyTotals::default();
        totals.add(2020, 130.0);
        totals.add(2021, 50.0);

        let json = serde_json::to_string(&totals).unwrap();
        assert_eq!(json, r#"{"2020":130.0,"2021":50.0}"#);
    }

    #[test]
    fn test_matrix_value_lookup() {
        let matrix = IndustryYearMatrix {
            years: vec![2020, 2021],
            series: vec![IndustrySeries {
                industry: "Health".to_string(),
                values: vec![30.0, 0.0],
            }],
        };

        assert_eq!(matrix.value("Health", 2021), Some(0.0));
        assert_eq!(matrix.value("Health", 1999), None);
        assert_eq!(matrix.value("Tech", 2020), None);
    }

    #[test]
    fn test_chart_dataset_omits_unset_styling() {
        let dataset = ChartDataset {
            border_color: Some("#FF6384".to_string()),
            ..ChartDataset::new("Tech", vec![1.0])
        };

        let json = serde_json::to_value(&dataset).unwrap();
        assert_eq!(json["borderColor"], "#FF6384");
        assert!(json.get("backgroundColor").is_none());
        assert!(json.get("tension").is_none());
    }

    #[test]
    fn test_industry_order_serde_names() {
        let order: IndustryOrder = serde_json::from_str(r#""alphabetical""#).unwrap();
        assert_eq!(order, IndustryOrder::Alphabetical);
        assert_eq!(
            serde_json::to_string(&IndustryOrder::FirstAppearance).unwrap(),
            r#""first-appearance""#
        );
    }
}
