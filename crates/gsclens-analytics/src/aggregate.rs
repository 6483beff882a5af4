//! Grouping, top-N selection and whole-dataset summary statistics.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use gsclens_core::{Dataset, Dimension, Record};
use serde::Serialize;

/// Group key used for records that have no value for the grouping field.
pub const NONE_GROUP: &str = "(none)";

/// The record fields a dataset can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupBy {
    Date,
    Query,
    Page,
}

impl GroupBy {
    #[must_use]
    pub fn dimension(self) -> Dimension {
        match self {
            GroupBy::Date => Dimension::Date,
            GroupBy::Query => Dimension::Query,
            GroupBy::Page => Dimension::Page,
        }
    }

    /// Raw grouping value; `None` is its own group, distinct from any text.
    pub(crate) fn key(self, record: &Record) -> Option<String> {
        record.dimension_value(self.dimension())
    }
}

/// Sums of counts and means of rates over one group of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub group_key: String,
    pub clicks: u64,
    pub impressions: u64,
    /// Unweighted mean of the members' CTRs.
    pub ctr: f64,
    /// Unweighted mean of the members' positions.
    pub position: f64,
}

impl AggregateRow {
    /// `clicks / impressions`, or `0.0` with no impressions.
    #[must_use]
    pub fn ratio_ctr(&self) -> f64 {
        ratio_ctr(self.clicks, self.impressions)
    }
}

/// Column an [`AggregateRow`] list can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Clicks,
    Impressions,
    Ctr,
    Position,
}

impl SortKey {
    #[allow(clippy::cast_precision_loss)]
    fn value(self, row: &AggregateRow) -> f64 {
        match self {
            SortKey::Clicks => row.clicks as f64,
            SortKey::Impressions => row.impressions as f64,
            SortKey::Ctr => row.ctr,
            SortKey::Position => row.position,
        }
    }
}

#[derive(Default)]
struct Accumulator {
    clicks: u64,
    impressions: u64,
    ctr_sum: f64,
    position_sum: f64,
    members: usize,
}

/// Arithmetic mean, `0.0` for an empty input.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean_of(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// `clicks / impressions` as a fraction, `0.0` when there are no impressions.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio_ctr(clicks: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        0.0
    } else {
        clicks as f64 / impressions as f64
    }
}

/// Groups records by `group_by` and reduces each group.
///
/// Counts are summed; CTR and position are averaged over the group's
/// members. Rows come back ordered by descending clicks, ties keeping the
/// order in which each group key was first seen. Records missing the grouping
/// field form their own group, labelled [`NONE_GROUP`].
#[must_use]
pub fn group_and_reduce(dataset: &Dataset, group_by: GroupBy) -> Vec<AggregateRow> {
    keyed_groups(dataset, group_by)
        .into_iter()
        .map(|(_, row)| row)
        .collect()
}

/// [`group_and_reduce`] with each row paired with its raw group key.
pub(crate) fn keyed_groups(
    dataset: &Dataset,
    group_by: GroupBy,
) -> Vec<(Option<String>, AggregateRow)> {
    let mut index: HashMap<Option<String>, usize> = HashMap::new();
    let mut groups: Vec<(Option<String>, Accumulator)> = Vec::new();

    for record in dataset {
        let key = group_by.key(record);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, Accumulator::default()));
                groups.len() - 1
            }
        };
        let acc = &mut groups[slot].1;
        acc.clicks += record.clicks;
        acc.impressions += record.impressions;
        acc.ctr_sum += record.ctr;
        acc.position_sum += record.position;
        acc.members += 1;
    }

    let mut rows: Vec<(Option<String>, AggregateRow)> = groups
        .into_iter()
        .map(|(key, acc)| {
            let row = AggregateRow {
                group_key: key.clone().unwrap_or_else(|| NONE_GROUP.to_string()),
                clicks: acc.clicks,
                impressions: acc.impressions,
                ctr: mean_of(acc.ctr_sum, acc.members),
                position: mean_of(acc.position_sum, acc.members),
            };
            (key, row)
        })
        .collect();

    // Stable, so ties keep first-seen order.
    rows.sort_by_key(|(_, row)| Reverse(row.clicks));
    rows
}

/// Returns the first `n` rows ranked descending by `sort_key`.
///
/// Ties keep their input order, so applying `top_n` to its own output
/// returns the same rows.
#[must_use]
pub fn top_n(rows: &[AggregateRow], n: usize, sort_key: SortKey) -> Vec<AggregateRow> {
    if n == 0 {
        return Vec::new();
    }
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| sort_key.value(b).total_cmp(&sort_key.value(a)));
    ranked.truncate(n);
    ranked
}

/// Whole-dataset statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalSummary {
    pub row_count: usize,
    pub total_clicks: u64,
    pub total_impressions: u64,
    /// Unweighted mean of per-row CTR.
    pub avg_ctr: f64,
    pub avg_position: f64,
    pub unique_query_count: usize,
    pub unique_page_count: usize,
    /// `(min, max)` over dated rows; `None` when no row carries a date.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl GlobalSummary {
    /// `total_clicks / total_impressions`, the impression-weighted CTR.
    #[must_use]
    pub fn ratio_ctr(&self) -> f64 {
        ratio_ctr(self.total_clicks, self.total_impressions)
    }

    /// `"YYYY-MM-DD - YYYY-MM-DD"`, or `"N/A"` with no dated rows.
    #[must_use]
    pub fn date_range_label(&self) -> String {
        match self.date_range {
            Some((start, end)) => format!("{start} - {end}"),
            None => "N/A".to_string(),
        }
    }
}

/// Computes totals, unweighted means, distinct counts and the date span.
///
/// An empty dataset yields zeros and a `"N/A"` date range.
#[must_use]
pub fn global_summary(dataset: &Dataset) -> GlobalSummary {
    let mut queries: HashSet<&str> = HashSet::new();
    let mut pages: HashSet<&str> = HashSet::new();
    let mut date_range: Option<(NaiveDate, NaiveDate)> = None;
    let mut ctr_sum = 0.0;
    let mut position_sum = 0.0;

    for record in dataset {
        ctr_sum += record.ctr;
        position_sum += record.position;
        if let Some(q) = record.query.as_deref() {
            queries.insert(q);
        }
        if let Some(p) = record.page.as_deref() {
            pages.insert(p);
        }
        if let Some(d) = record.date {
            date_range = Some(match date_range {
                Some((lo, hi)) => (lo.min(d), hi.max(d)),
                None => (d, d),
            });
        }
    }

    GlobalSummary {
        row_count: dataset.len(),
        total_clicks: dataset.total_clicks(),
        total_impressions: dataset.total_impressions(),
        avg_ctr: mean_of(ctr_sum, dataset.len()),
        avg_position: mean_of(position_sum, dataset.len()),
        unique_query_count: queries.len(),
        unique_page_count: pages.len(),
        date_range,
    }
}

/// Headline numbers for the dashboard overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub total_clicks: u64,
    pub total_impressions: u64,
    /// `clicks / impressions * 100`, rounded to two decimals.
    pub ctr_percent: f64,
    /// Mean daily position, rounded to one decimal.
    pub avg_position: f64,
    /// Number of rows in the per-query breakdown.
    pub total_queries: usize,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Builds the overview from a per-date breakdown and a per-query breakdown
/// of the same window. An empty per-date dataset yields all zeros.
#[must_use]
pub fn performance_summary(by_date: &Dataset, by_query: &Dataset) -> PerformanceSummary {
    if by_date.is_empty() {
        return PerformanceSummary {
            total_clicks: 0,
            total_impressions: 0,
            ctr_percent: 0.0,
            avg_position: 0.0,
            total_queries: 0,
        };
    }

    let summary = global_summary(by_date);
    PerformanceSummary {
        total_clicks: summary.total_clicks,
        total_impressions: summary.total_impressions,
        ctr_percent: round_to(summary.ratio_ctr() * 100.0, 2),
        avg_position: round_to(summary.avg_position, 1),
        total_queries: by_query.len(),
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
