//! Keyword- and threshold-based partitions of a dataset.
//!
//! Two independent schemes live here: the branded / non-branded split driven
//! by brand keywords, and the CTR-opportunity selection driven by numeric
//! thresholds over per-query aggregates.

use std::cmp::Reverse;
use std::collections::HashSet;

use gsclens_core::{Dataset, Record};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::aggregate::{
    group_and_reduce, keyed_groups, mean_of, ratio_ctr, AggregateRow, GroupBy,
};

/// Aggregate figures carried by a [`Segment`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentStats {
    pub members: usize,
    pub clicks: u64,
    pub impressions: u64,
    /// Unweighted mean of member CTRs.
    pub ctr: f64,
    pub position: f64,
}

impl SegmentStats {
    #[must_use]
    pub fn of(dataset: &Dataset) -> Self {
        let ctr_sum: f64 = dataset.iter().map(|r| r.ctr).sum();
        let position_sum: f64 = dataset.iter().map(|r| r.position).sum();
        Self {
            members: dataset.len(),
            clicks: dataset.total_clicks(),
            impressions: dataset.total_impressions(),
            ctr: mean_of(ctr_sum, dataset.len()),
            position: mean_of(position_sum, dataset.len()),
        }
    }
}

/// A named slice of a dataset with its own aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: &'static str,
    pub dataset: Dataset,
    pub stats: SegmentStats,
}

impl Segment {
    fn new(name: &'static str, dataset: Dataset) -> Self {
        let stats = SegmentStats::of(&dataset);
        Self {
            name,
            dataset,
            stats,
        }
    }
}

/// Case-insensitive substring matcher over a keyword list.
///
/// All keywords are compiled into one alternation. Blank keywords are
/// ignored, and a matcher with no keywords matches nothing.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    inner: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Nothing,
    Pattern(Regex),
    // Used only when the alternation exceeds the regex size limit.
    Lowercase(Vec<String>),
}

impl KeywordMatcher {
    #[must_use]
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let keywords: Vec<&str> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Self {
                inner: Matcher::Nothing,
            };
        }

        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let inner = match RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Matcher::Pattern(re),
            Err(_) => Matcher::Lowercase(keywords.iter().map(|k| k.to_lowercase()).collect()),
        };
        Self { inner }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.inner, Matcher::Nothing)
    }

    /// Whether `text` contains any keyword, ignoring case.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match &self.inner {
            Matcher::Nothing => false,
            Matcher::Pattern(re) => re.is_match(text),
            Matcher::Lowercase(keywords) => {
                let text = text.to_lowercase();
                keywords.iter().any(|k| text.contains(k.as_str()))
            }
        }
    }

    /// Whether the record's query matches. Records without a query never do.
    #[must_use]
    pub fn matches_record(&self, record: &Record) -> bool {
        record.query.as_deref().is_some_and(|q| self.is_match(q))
    }
}

/// Branded / non-branded partition of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandSplit {
    pub branded: Segment,
    pub non_branded: Segment,
    /// `branded clicks / total clicks * 100`, `0.0` with no clicks.
    pub branded_percentage: f64,
}

/// Splits `dataset` into records whose query contains a brand keyword and
/// everything else.
///
/// An empty keyword list puts every record in `non_branded`.
#[must_use]
pub fn classify_branded<S: AsRef<str>>(dataset: &Dataset, brand_keywords: &[S]) -> BrandSplit {
    let matcher = KeywordMatcher::new(brand_keywords);
    let branded = Segment::new("branded", dataset.filter(|r| matcher.matches_record(r)));
    let non_branded = Segment::new(
        "non_branded",
        dataset.filter(|r| !matcher.matches_record(r)),
    );
    let total = branded.stats.clicks + non_branded.stats.clicks;
    let branded_percentage = ratio_ctr(branded.stats.clicks, total) * 100.0;

    BrandSplit {
        branded,
        non_branded,
        branded_percentage,
    }
}

/// Thresholds for the CTR-opportunity selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpportunityCriteria {
    pub min_impressions: u64,
    /// Groups must rank strictly below this position (numerically above).
    pub position_threshold: f64,
    /// Groups must convert strictly under this CTR.
    pub ctr_threshold: f64,
    pub limit: usize,
}

impl Default for OpportunityCriteria {
    fn default() -> Self {
        Self {
            min_impressions: 100,
            position_threshold: 3.0,
            ctr_threshold: 0.05,
            limit: 10,
        }
    }
}

impl OpportunityCriteria {
    #[must_use]
    pub fn with_min_impressions(min_impressions: u64) -> Self {
        Self {
            min_impressions,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn accepts(&self, row: &AggregateRow) -> bool {
        row.impressions >= self.min_impressions
            && row.position > self.position_threshold
            && row.ctr < self.ctr_threshold
    }
}

fn by_impressions_desc(rows: &mut [AggregateRow]) {
    rows.sort_by_key(|row| Reverse(row.impressions));
}

/// Query groups with many impressions, a sub-top-3 position and a low CTR,
/// ordered by descending impressions and capped at `criteria.limit`.
#[must_use]
pub fn find_opportunities(dataset: &Dataset, criteria: &OpportunityCriteria) -> Vec<AggregateRow> {
    let mut rows: Vec<AggregateRow> = group_and_reduce(dataset, GroupBy::Query)
        .into_iter()
        .filter(|row| criteria.accepts(row))
        .collect();
    by_impressions_desc(&mut rows);
    rows.truncate(criteria.limit);
    rows
}

/// Splits a dataset into records whose query group is an opportunity and the
/// rest. Unlike [`find_opportunities`] no cap is applied.
#[must_use]
pub fn partition_opportunities(
    dataset: &Dataset,
    criteria: &OpportunityCriteria,
) -> (Segment, Segment) {
    let selected: HashSet<Option<String>> = keyed_groups(dataset, GroupBy::Query)
        .into_iter()
        .filter(|(_, row)| criteria.accepts(row))
        .map(|(key, _)| key)
        .collect();
    let in_group = |r: &Record| selected.contains(&GroupBy::Query.key(r));
    (
        Segment::new("opportunity", dataset.filter(in_group)),
        Segment::new("non_opportunity", dataset.filter(|r| !in_group(r))),
    )
}

/// Position band for the high-potential selection: `low < position <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionBand {
    pub min_impressions: u64,
    pub low: f64,
    pub high: f64,
    pub limit: usize,
}

impl Default for PositionBand {
    fn default() -> Self {
        Self {
            min_impressions: 100,
            low: 3.0,
            high: 10.0,
            limit: 10,
        }
    }
}

/// Query groups ranking on page one below the top three, ordered by
/// descending impressions then ascending position.
#[must_use]
pub fn find_high_potential(dataset: &Dataset, band: &PositionBand) -> Vec<AggregateRow> {
    let mut rows: Vec<AggregateRow> = group_and_reduce(dataset, GroupBy::Query)
        .into_iter()
        .filter(|row| {
            row.position > band.low
                && row.position <= band.high
                && row.impressions >= band.min_impressions
        })
        .collect();
    rows.sort_by(|a, b| {
        b.impressions
            .cmp(&a.impressions)
            .then_with(|| a.position.total_cmp(&b.position))
    });
    rows.truncate(band.limit);
    rows
}

/// Performance of queries mentioning competitor keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorReport {
    pub keywords: Vec<String>,
    pub matched_rows: usize,
    pub total_clicks: u64,
    pub avg_position: f64,
    /// Up to five matched query groups by clicks.
    pub top_queries: Vec<AggregateRow>,
}

/// Collects rows whose query contains any competitor keyword.
#[must_use]
pub fn competitor_report<S: AsRef<str>>(dataset: &Dataset, keywords: &[S]) -> CompetitorReport {
    let matcher = KeywordMatcher::new(keywords);
    let matched = dataset.filter(|r| matcher.matches_record(r));
    let stats = SegmentStats::of(&matched);
    let mut top_queries = group_and_reduce(&matched, GroupBy::Query);
    top_queries.truncate(5);

    CompetitorReport {
        keywords: keywords.iter().map(|k| k.as_ref().to_string()).collect(),
        matched_rows: stats.members,
        total_clicks: stats.clicks,
        avg_position: stats.position,
        top_queries,
    }
}

#[cfg(test)]
#[path = "segment_test.rs"]
mod tests;
