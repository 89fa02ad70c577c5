//! Report generation.
//!
//! This module renders a funding [`Report`] as Markdown (two chart
//! sections rendered as tables), as full JSON, or as the bare chart
//! payloads for an external renderer.

use crate::analysis::{peak_year, year_over_year};
use crate::models::{IndustryTotal, IndustryYearMatrix, Report, ReportMetadata, SkippedRecord, YearlyTotals};
use anyhow::Result;
use serde_json::json;

/// Width of the widest text bar in the yearly table.
const BAR_WIDTH: usize = 30;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", report.title));

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_summary_section(report));
    output.push_str(&generate_yearly_section(&report.yearly_totals));
    output.push_str(&generate_industry_section(&report.industry_matrix));
    output.push_str(&generate_ranking_section(
        &report.industry_ranking,
        report.metadata.total_funding,
    ));
    output.push_str(&generate_skipped_section(&report.skipped));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Records Aggregated:** {}\n",
        metadata.records_loaded
    ));
    if metadata.records_skipped > 0 {
        section.push_str(&format!(
            "- **Records Skipped:** {}\n",
            metadata.records_skipped
        ));
    }
    section.push_str(&format!("- **Industry Order:** {}\n", metadata.industry_order));
    section.push_str(&format!("- **Duration:** {:.2}s\n", metadata.duration_seconds));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Summary](#summary)\n");
    toc.push_str("- [Total Funding by Year](#total-funding-by-year)\n");
    toc.push_str("- [Funding Trends by Industry](#funding-trends-by-industry)\n");
    if !report.industry_ranking.is_empty() {
        toc.push_str("- [Top Industries](#top-industries)\n");
    }
    if !report.skipped.is_empty() {
        toc.push_str("- [Skipped Records](#skipped-records)\n");
    }
    toc.push('\n');

    toc
}

/// Generate the summary section.
fn generate_summary_section(report: &Report) -> String {
    let mut section = String::new();
    let metadata = &report.metadata;

    section.push_str("## Summary\n\n");
    section.push_str("| Total Funding | Years | Industries | Peak Year |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");

    let peak = match peak_year(&report.yearly_totals) {
        Some((year, total)) => format!("{} ({})", year, format_amount(total)),
        None => "-".to_string(),
    };

    section.push_str(&format!(
        "| **{}** | {} | {} | {} |\n\n",
        format_amount(metadata.total_funding),
        metadata.years,
        metadata.industries,
        peak
    ));

    section
}

/// Generate the yearly totals section (bar chart counterpart).
fn generate_yearly_section(totals: &YearlyTotals) -> String {
    let mut section = String::new();

    section.push_str("## Total Funding by Year\n\n");

    if totals.is_empty() {
        section.push_str("No funding records were available.\n\n");
        return section;
    }

    section.push_str("| Year | Total Funding ($) | Change | |\n");
    section.push_str("|:---|---:|---:|:---|\n");

    let max = totals.values().into_iter().fold(0.0_f64, f64::max);

    for (year, change) in year_over_year(totals) {
        let total = totals.get(year).unwrap_or(0.0);
        let change = match change {
            Some(pct) => format!("{:+.1}%", pct),
            None => "-".to_string(),
        };
        section.push_str(&format!(
            "| {} | {} | {} | `{}` |\n",
            year,
            format_amount(total),
            change,
            text_bar(total, max)
        ));
    }
    section.push('\n');

    section
}

/// Generate the industry×year section (line chart counterpart).
fn generate_industry_section(matrix: &IndustryYearMatrix) -> String {
    let mut section = String::new();

    section.push_str("## Funding Trends by Industry\n\n");

    if matrix.is_empty() {
        section.push_str("No funding records were available.\n\n");
        return section;
    }

    section.push_str("| Industry |");
    for year in &matrix.years {
        section.push_str(&format!(" {} |", year));
    }
    section.push_str(" **Total** |\n");

    section.push_str("|:---|");
    section.push_str(&"---:|".repeat(matrix.years.len() + 1));
    section.push('\n');

    for series in &matrix.series {
        section.push_str(&format!("| {} |", escape_cell(&series.industry)));
        for value in &series.values {
            section.push_str(&format!(" {} |", format_amount(*value)));
        }
        section.push_str(&format!(" **{}** |\n", format_amount(series.total())));
    }
    section.push('\n');

    section
}

/// Generate the industry ranking section.
fn generate_ranking_section(ranking: &[IndustryTotal], grand_total: f64) -> String {
    if ranking.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Top Industries\n\n");
    section.push_str("| Rank | Industry | Total | Share |\n");
    section.push_str("|:---:|:---|---:|---:|\n");

    for (i, entry) in ranking.iter().enumerate() {
        let share = if grand_total != 0.0 {
            format!("{:.1}%", entry.total / grand_total * 100.0)
        } else {
            "-".to_string()
        };
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            i + 1,
            escape_cell(&entry.industry),
            format_amount(entry.total),
            share
        ));
    }
    section.push('\n');

    section
}

/// Generate the skipped records section.
fn generate_skipped_section(skipped: &[SkippedRecord]) -> String {
    if skipped.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Skipped Records\n\n");
    section.push_str(&format!(
        "{} malformed record(s) were left out of every total:\n\n",
        skipped.len()
    ));
    for record in skipped {
        section.push_str(&format!("- #{}: {}\n", record.index, record.reason));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by fundtrack v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate only the two chart payloads as JSON.
pub fn generate_chart_payload(report: &Report) -> Result<String> {
    let payload = json!({
        "bar": report.bar_chart,
        "line": report.line_chart,
    });
    serde_json::to_string_pretty(&payload).map_err(Into::into)
}

/// Format an amount as dollars with thousands separators and at most
/// two decimals, e.g. `$1,234.5`.
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", amount);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{}", sign, grouped, frac_part)
    }
}

fn text_bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(width.max(1))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartData, IndustryOrder, IndustrySeries};
    use chrono::Utc;

    fn create_test_report() -> Report {
        let mut yearly_totals = YearlyTotals::default();
        yearly_totals.add(2020, 130.0);
        yearly_totals.add(2021, 50.0);

        Report {
            title: "Funding Tracker".to_string(),
            metadata: ReportMetadata {
                source: "funding.json".to_string(),
                generated_at: Utc::now(),
                records_loaded: 3,
                records_skipped: 1,
                years: 2,
                industries: 2,
                total_funding: 180.0,
                industry_order: IndustryOrder::FirstAppearance,
                duration_seconds: 0.01,
            },
            yearly_totals,
            industry_matrix: IndustryYearMatrix {
                years: vec![2020, 2021],
                series: vec![
                    IndustrySeries {
                        industry: "Tech".to_string(),
                        values: vec![100.0, 50.0],
                    },
                    IndustrySeries {
                        industry: "Health".to_string(),
                        values: vec![30.0, 0.0],
                    },
                ],
            },
            bar_chart: ChartData::default(),
            line_chart: ChartData::default(),
            industry_ranking: vec![
                IndustryTotal {
                    industry: "Tech".to_string(),
                    total: 150.0,
                },
                IndustryTotal {
                    industry: "Health".to_string(),
                    total: 30.0,
                },
            ],
            skipped: vec![SkippedRecord {
                index: 3,
                reason: "record 3 is missing field `amount`".to_string(),
            }],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Funding Tracker"));
        assert!(markdown.contains("## Total Funding by Year"));
        assert!(markdown.contains("## Funding Trends by Industry"));
        assert!(markdown.contains("| 2020 | $130 | - |"));
        assert!(markdown.contains("| 2021 | $50 | -61.5% |"));
        assert!(markdown.contains("| Health | $30 | $0 | **$30** |"));
        assert!(markdown.contains("## Skipped Records"));
        assert!(markdown.contains("- #3: record 3 is missing field `amount`"));
    }

    #[test]
    fn test_generate_metadata_section() {
        let report = create_test_report();
        let section = generate_metadata_section(&report.metadata);

        assert!(section.contains("`funding.json`"));
        assert!(section.contains("Records Aggregated:** 3"));
        assert!(section.contains("Records Skipped:** 1"));
        assert!(section.contains("first-appearance"));
    }

    #[test]
    fn test_empty_report_sections() {
        let section = generate_yearly_section(&YearlyTotals::default());
        assert!(section.contains("No funding records"));

        let section = generate_industry_section(&IndustryYearMatrix::default());
        assert!(section.contains("No funding records"));

        assert!(generate_ranking_section(&[], 0.0).is_empty());
        assert!(generate_skipped_section(&[]).is_empty());
    }

    #[test]
    fn test_ranking_share() {
        let report = create_test_report();
        let section = generate_ranking_section(&report.industry_ranking, 180.0);

        assert!(section.contains("| 1 | Tech | $150 | 83.3% |"));
        assert!(section.contains("| 2 | Health | $30 | 16.7% |"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"yearly_totals\""));
        assert!(json.contains("\"industry_matrix\""));
        assert!(json.contains("\"2020\": 130.0"));
    }

    #[test]
    fn test_generate_chart_payload() {
        let report = create_test_report();
        let payload: serde_json::Value =
            serde_json::from_str(&generate_chart_payload(&report).unwrap()).unwrap();

        assert!(payload["bar"]["labels"].is_array());
        assert!(payload["line"]["datasets"].is_array());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "$0");
        assert_eq!(format_amount(950.0), "$950");
        assert_eq!(format_amount(1_234_567.0), "$1,234,567");
        assert_eq!(format_amount(1234.5), "$1,234.5");
        assert_eq!(format_amount(-2500.25), "-$2,500.25");
        assert_eq!(format_amount(999.999), "$1,000");
        assert_eq!(format_amount(-0.001), "$0");
    }

    #[test]
    fn test_text_bar_scaling() {
        assert_eq!(text_bar(100.0, 100.0).chars().count(), BAR_WIDTH);
        assert_eq!(text_bar(50.0, 100.0).chars().count(), BAR_WIDTH / 2);
        assert_eq!(text_bar(0.1, 100.0).chars().count(), 1);
        assert!(text_bar(0.0, 100.0).is_empty());
        assert!(text_bar(5.0, 0.0).is_empty());
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("AI|ML"), "AI\\|ML");
    }
}
