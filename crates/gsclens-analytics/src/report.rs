use std::fmt::Write as _;

use gsclens_core::Dataset;

use crate::aggregate::global_summary;
use crate::summary::{thousands, NO_DATA};

/// Deterministic executive summary for a reporting period.
///
/// CTR here is the impression-weighted ratio `total_clicks / total_impressions`,
/// not the per-row mean used by the other digests.
#[must_use]
pub fn executive_report(dataset: &Dataset, period_label: &str) -> String {
    if dataset.is_empty() {
        return NO_DATA.to_string();
    }

    let summary = global_summary(dataset);
    let mut out = format!("{} Report - Google Search Console\n\n", title_case(period_label));
    out.push_str("Executive summary\n");
    let _ = writeln!(
        out,
        "- Performance: {} clicks from {} impressions",
        thousands(summary.total_clicks),
        thousands(summary.total_impressions)
    );
    let _ = writeln!(out, "- CTR: {:.2}%", summary.ratio_ctr() * 100.0);
    let _ = writeln!(out, "- Average position: {:.1}", summary.avg_position);
    if summary.unique_query_count > 0 {
        let _ = writeln!(
            out,
            "- Queries tracked: {}",
            thousands(summary.unique_query_count as u64)
        );
    }
    out.push_str("\nRecommendation: enable AI analysis for more detailed, actionable insights.");
    out
}

fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsclens_core::Record;

    fn rec(query: &str, clicks: u64, impressions: u64, ctr: f64) -> Record {
        Record {
            date: None,
            query: Some(query.to_string()),
            page: None,
            clicks,
            impressions,
            ctr,
            position: 4.0,
        }
    }

    #[test]
    fn executive_report_uses_ratio_ctr() {
        let ds = Dataset::from_records(vec![rec("a", 1, 2, 0.5), rec("b", 1, 8, 0.125)]);
        let report = executive_report(&ds, "monthly");
        assert!(report.starts_with("Monthly Report"));
        assert!(report.contains("2 clicks from 10 impressions"));
        // ratio is 20%, the row mean would be 31.25%
        assert!(report.contains("- CTR: 20.00%"));
        assert!(report.contains("- Average position: 4.0"));
        assert!(report.contains("- Queries tracked: 2"));
        assert!(report.contains("Recommendation"));
    }

    #[test]
    fn executive_report_of_empty_dataset_is_notice() {
        assert_eq!(executive_report(&Dataset::empty(), "weekly"), NO_DATA);
    }
}
