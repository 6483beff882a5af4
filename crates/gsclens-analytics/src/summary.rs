//! Plain-text digests of analysis results.
//!
//! Digests are line-oriented with fixed sections (period, totals, averages,
//! top-N lists) so they read well both on a terminal and inside a language
//! model prompt. Every formatter accepts empty input and emits [`NO_DATA`]
//! instead of failing.

use std::fmt::Write as _;

use gsclens_core::Dataset;

use crate::aggregate::{global_summary, group_and_reduce, AggregateRow, GroupBy};
use crate::segment::{BrandSplit, CompetitorReport};
use crate::trend::{daily_series, daily_trend_direction, recent_vs_early, Metric, TrendResult};

/// Line emitted in place of a digest when there is nothing to summarise.
pub const NO_DATA: &str = "No data available for analysis.";

const TOP_LIMIT: usize = 5;

/// Formats an integer with `,` thousands separators.
pub(crate) fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a fraction as a percentage with two decimals.
pub(crate) fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

fn push_top(out: &mut String, heading: &str, rows: &[AggregateRow]) {
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(out, "{heading}:");
    for row in rows {
        let _ = writeln!(out, "- {}: {} clicks", row.group_key, thousands(row.clicks));
    }
}

/// General digest of a dataset: period, totals, averages, top queries and
/// pages, and the recent-versus-early click trend.
#[must_use]
pub fn dataset_digest(dataset: &Dataset) -> String {
    if dataset.is_empty() {
        return NO_DATA.to_string();
    }

    let summary = global_summary(dataset);
    let mut out = String::new();
    let _ = writeln!(out, "Period: {}", summary.date_range_label());
    let _ = writeln!(out, "Rows: {}", thousands(summary.row_count as u64));
    let _ = writeln!(out, "Total clicks: {}", thousands(summary.total_clicks));
    let _ = writeln!(
        out,
        "Total impressions: {}",
        thousands(summary.total_impressions)
    );
    let _ = writeln!(out, "Average CTR: {}", percent(summary.avg_ctr));
    let _ = writeln!(out, "Average position: {:.1}", summary.avg_position);

    if summary.unique_query_count > 0 {
        let _ = writeln!(
            out,
            "Unique queries: {}",
            thousands(summary.unique_query_count as u64)
        );
        let mut top = group_and_reduce(dataset, GroupBy::Query);
        top.truncate(TOP_LIMIT);
        push_top(&mut out, "Top queries by clicks", &top);
    }
    if summary.unique_page_count > 0 {
        let _ = writeln!(
            out,
            "Unique pages: {}",
            thousands(summary.unique_page_count as u64)
        );
        let mut top = group_and_reduce(dataset, GroupBy::Page);
        top.truncate(TOP_LIMIT);
        push_top(&mut out, "Top pages by clicks", &top);
    }
    if let Some(rve) = recent_vs_early(dataset) {
        let label = if rve.is_growth() { "growth" } else { "decline" };
        let _ = writeln!(
            out,
            "Recent trend: {label} ({:.0} vs {:.0} average daily clicks)",
            rve.recent_avg, rve.early_avg
        );
    }

    out.trim_end().to_string()
}

/// Renders an aggregate table under `title`, one line per row.
#[must_use]
pub fn aggregate_digest(title: &str, rows: &[AggregateRow]) -> String {
    if rows.is_empty() {
        return format!("{title}\n{NO_DATA}");
    }
    let mut out = format!("{title}\n");
    for (rank, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} | clicks {} | impressions {} | CTR {} | position {:.1}",
            rank + 1,
            row.group_key,
            thousands(row.clicks),
            thousands(row.impressions),
            percent(row.ctr),
            row.position
        );
    }
    out.trim_end().to_string()
}

/// Opportunity table with the estimated clicks left on the table at a
/// target CTR.
#[must_use]
pub fn opportunity_digest(rows: &[AggregateRow], target_ctr: f64) -> String {
    let mut out = aggregate_digest("CTR opportunities (high impressions, low CTR)", rows);
    if rows.is_empty() {
        return out;
    }
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let potential: u64 = rows
        .iter()
        .map(|r| ((r.impressions as f64 * target_ctr) - r.clicks as f64).max(0.0) as u64)
        .sum();
    let _ = write!(
        out,
        "\nPotential additional clicks at {} CTR: {}",
        percent(target_ctr),
        thousands(potential)
    );
    out
}

/// Branded versus non-branded totals and shares.
#[must_use]
pub fn brand_digest(split: &BrandSplit) -> String {
    let total = split.branded.stats.clicks + split.non_branded.stats.clicks;
    if split.branded.stats.members + split.non_branded.stats.members == 0 {
        return NO_DATA.to_string();
    }

    let mut out = String::new();
    for segment in [&split.branded, &split.non_branded] {
        let _ = writeln!(
            out,
            "{}: {} clicks, {} impressions, {} rows, average position {:.1}",
            segment.name,
            thousands(segment.stats.clicks),
            thousands(segment.stats.impressions),
            segment.stats.members,
            segment.stats.position
        );
    }
    let _ = writeln!(out, "Total clicks: {}", thousands(total));
    let _ = write!(
        out,
        "Branded share of clicks: {:.1}%",
        split.branded_percentage
    );
    out
}

/// Current versus previous period, metric by metric, plus the daily trend of
/// the current period when it carries dates.
#[must_use]
pub fn trend_digest(result: &TrendResult, current: &Dataset) -> String {
    if result.current.row_count == 0 && result.previous.row_count == 0 {
        return NO_DATA.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Current period: {}",
        result.current.date_range_label()
    );
    let _ = writeln!(
        out,
        "Previous period: {}",
        result.previous.date_range_label()
    );
    let _ = writeln!(
        out,
        "Clicks: {} vs {}",
        thousands(result.current.total_clicks),
        thousands(result.previous.total_clicks)
    );
    let _ = writeln!(
        out,
        "Impressions: {} vs {}",
        thousands(result.current.total_impressions),
        thousands(result.previous.total_impressions)
    );
    let _ = writeln!(
        out,
        "Average CTR: {} vs {}",
        percent(result.current.avg_ctr),
        percent(result.previous.avg_ctr)
    );
    let _ = writeln!(
        out,
        "Average position: {:.1} vs {:.1}",
        result.current.avg_position, result.previous.avg_position
    );
    for metric in Metric::ALL {
        match result.percent_changes.get(&metric) {
            Some(change) => {
                let _ = writeln!(out, "Change in {metric}: {change:+.1}%");
            }
            None => {
                let _ = writeln!(out, "Change in {metric}: n/a (no previous data)");
            }
        }
    }
    let _ = writeln!(out, "Overall direction: {}", result.direction);

    let reading = daily_trend_direction(&daily_series(current));
    if reading.insufficient_data() {
        let _ = write!(out, "Daily trend: insufficient data");
    } else {
        let _ = write!(out, "Daily trend: {}", reading.direction);
    }
    out
}

/// Competitor keyword performance, or a notice when there is nothing to
/// report.
#[must_use]
pub fn competitor_digest(report: &CompetitorReport) -> String {
    if report.keywords.is_empty() {
        return "No competitor keywords configured.".to_string();
    }
    if report.matched_rows == 0 {
        return format!(
            "No data found for competitor keywords: {}",
            report.keywords.join(", ")
        );
    }

    let mut out = String::from("Competitor keyword metrics:\n");
    let _ = writeln!(out, "- Total clicks: {}", thousands(report.total_clicks));
    let _ = writeln!(out, "- Average position: {:.1}", report.avg_position);
    let _ = writeln!(out, "- Matched rows: {}", report.matched_rows);
    push_top(&mut out, "Top competitor queries", &report.top_queries);
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{classify_branded, competitor_report};
    use crate::trend::compare_periods;
    use chrono::NaiveDate;
    use gsclens_core::Record;

    fn rec(day: u32, query: &str, page: &str, clicks: u64, impressions: u64) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2025, 1, day),
            query: Some(query.to_string()),
            page: Some(page.to_string()),
            clicks,
            impressions,
            ctr: 0.1,
            position: 3.0,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            rec(1, "shoes", "/shoes", 1200, 10_000),
            rec(2, "boots", "/boots", 40, 900),
            rec(3, "shoes", "/shoes", 1300, 12_000),
        ])
    }

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn empty_dataset_digest_is_no_data() {
        assert_eq!(dataset_digest(&Dataset::empty()), NO_DATA);
    }

    #[test]
    fn dataset_digest_has_fixed_sections() {
        let digest = dataset_digest(&sample());
        assert!(digest.contains("Period: 2025-01-01 - 2025-01-03"));
        assert!(digest.contains("Total clicks: 2,540"));
        assert!(digest.contains("Total impressions: 22,900"));
        assert!(digest.contains("Average CTR: 10.00%"));
        assert!(digest.contains("Unique queries: 2"));
        assert!(digest.contains("- shoes: 2,500 clicks"));
        assert!(digest.contains("Top pages by clicks"));
        assert!(digest.contains("Recent trend:"));
    }

    #[test]
    fn aggregate_digest_tolerates_empty_rows() {
        let digest = aggregate_digest("Top queries", &[]);
        assert!(digest.starts_with("Top queries"));
        assert!(digest.contains(NO_DATA));
    }

    #[test]
    fn opportunity_digest_estimates_potential_clicks() {
        let rows = vec![AggregateRow {
            group_key: "widgets".to_string(),
            clicks: 10,
            impressions: 1000,
            ctr: 0.01,
            position: 5.0,
        }];
        let digest = opportunity_digest(&rows, 0.05);
        assert!(digest.contains("1. widgets"));
        assert!(digest.contains("Potential additional clicks at 5.00% CTR: 40"));
    }

    #[test]
    fn brand_digest_reports_share() {
        let split = classify_branded(&sample(), &["boots"]);
        let digest = brand_digest(&split);
        assert!(digest.contains("branded: 40 clicks"));
        assert!(digest.contains("non_branded: 2,500 clicks"));
        assert!(digest.contains("Branded share of clicks: 1.6%"));
    }

    #[test]
    fn brand_digest_of_empty_dataset_is_no_data() {
        let split = classify_branded(&Dataset::empty(), &["x"]);
        assert_eq!(brand_digest(&split), NO_DATA);
    }

    #[test]
    fn trend_digest_marks_missing_changes() {
        let current = sample();
        let result = compare_periods(&current, &Dataset::empty());
        let digest = trend_digest(&result, &current);
        assert!(digest.contains("Previous period: N/A"));
        assert!(digest.contains("Change in clicks: n/a"));
        assert!(digest.contains("Overall direction: growing"));
        assert!(digest.contains("Daily trend:"));
    }

    #[test]
    fn trend_digest_of_two_empty_periods_is_no_data() {
        let result = compare_periods(&Dataset::empty(), &Dataset::empty());
        assert_eq!(trend_digest(&result, &Dataset::empty()), NO_DATA);
    }

    #[test]
    fn competitor_digest_notices() {
        let none = competitor_report::<&str>(&sample(), &[]);
        assert_eq!(competitor_digest(&none), "No competitor keywords configured.");

        let missing = competitor_report(&sample(), &["acme", "globex"]);
        assert_eq!(
            competitor_digest(&missing),
            "No data found for competitor keywords: acme, globex"
        );

        let hit = competitor_report(&sample(), &["boot"]);
        let digest = competitor_digest(&hit);
        assert!(digest.contains("- Total clicks: 40"));
        assert!(digest.contains("- boots: 40 clicks"));
    }
}
