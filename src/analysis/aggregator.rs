//! Funding aggregation and statistics.
//!
//! This module reshapes a flat list of funding records into the
//! per-year totals and the industry×year matrix that back the two
//! charts, plus a few summary statistics derived from them.

use crate::models::{
    FundingRecord, IndustryOrder, IndustrySeries, IndustryTotal, IndustryYearMatrix, YearlyTotals,
};
use std::collections::{BTreeSet, HashMap};

/// Sum funding per year.
pub fn compute_yearly_totals(records: &[FundingRecord]) -> YearlyTotals {
    let mut totals = YearlyTotals::default();

    for record in records {
        totals.add(record.year, record.amount);
    }

    totals
}

/// Sum funding per industry and year, aligned to a shared year axis.
///
/// The year axis is the sorted union of every year in `records`. Each
/// industry gets one value per year, with `0.0` where it has no record.
pub fn compute_industry_year_matrix(
    records: &[FundingRecord],
    order: IndustryOrder,
) -> IndustryYearMatrix {
    let years: Vec<i64> = records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let column: HashMap<i64, usize> = years.iter().enumerate().map(|(i, y)| (*y, i)).collect();

    // Insertion order of first appearance
    let mut series: Vec<IndustrySeries> = Vec::new();
    let mut row: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let idx = *row.entry(record.industry.as_str()).or_insert_with(|| {
            series.push(IndustrySeries {
                industry: record.industry.clone(),
                values: vec![0.0; years.len()],
            });
            series.len() - 1
        });
        series[idx].values[column[&record.year]] += record.amount;
    }

    if order == IndustryOrder::Alphabetical {
        series.sort_by(|a, b| a.industry.cmp(&b.industry));
    }

    IndustryYearMatrix { years, series }
}

/// Rank industries by total funding, largest first.
pub fn industry_totals(matrix: &IndustryYearMatrix) -> Vec<IndustryTotal> {
    let mut totals: Vec<IndustryTotal> = matrix
        .series
        .iter()
        .map(|s| IndustryTotal {
            industry: s.industry.clone(),
            total: s.total(),
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.industry.cmp(&b.industry))
    });

    totals
}

/// Top N industries by total funding.
pub fn top_industries(matrix: &IndustryYearMatrix, n: usize) -> Vec<IndustryTotal> {
    let mut totals = industry_totals(matrix);
    totals.truncate(n);
    totals
}

/// Year with the largest total; the earliest year wins ties.
pub fn peak_year(totals: &YearlyTotals) -> Option<(i64, f64)> {
    totals.iter().fold(None, |best, (year, total)| match best {
        Some((_, best_total)) if total <= best_total => best,
        _ => Some((year, total)),
    })
}

/// Sum of every yearly total.
pub fn grand_total(totals: &YearlyTotals) -> f64 {
    totals.iter().map(|(_, total)| total).sum()
}

/// Percentage change of each year's total versus the previous year.
///
/// The first year, and any year following a zero total, has no change.
pub fn year_over_year(totals: &YearlyTotals) -> Vec<(i64, Option<f64>)> {
    let mut changes = Vec::with_capacity(totals.len());
    let mut previous: Option<f64> = None;

    for (year, total) in totals.iter() {
        let change = match previous {
            Some(prev) if prev != 0.0 => Some((total - prev) / prev * 100.0),
            _ => None,
        };
        changes.push((year, change));
        previous = Some(total);
    }

    changes
}
