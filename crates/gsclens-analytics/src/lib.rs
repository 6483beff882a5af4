//! Pure analysis over search-analytics [`Dataset`](gsclens_core::Dataset)s.
//!
//! Nothing in this crate performs I/O or returns errors: every operation
//! accepts an empty dataset and yields a zeroed or empty result, and every
//! ratio guards its denominator.

pub mod aggregate;
pub mod report;
pub mod segment;
pub mod summary;
pub mod trend;

pub use aggregate::{
    global_summary, group_and_reduce, performance_summary, ratio_ctr, top_n, AggregateRow,
    GlobalSummary, GroupBy, PerformanceSummary, SortKey, NONE_GROUP,
};
pub use report::executive_report;
pub use segment::{
    classify_branded, competitor_report, find_high_potential, find_opportunities,
    partition_opportunities, BrandSplit, CompetitorReport, KeywordMatcher, OpportunityCriteria,
    PositionBand, Segment, SegmentStats,
};
pub use summary::{
    aggregate_digest, brand_digest, competitor_digest, dataset_digest, opportunity_digest,
    trend_digest, NO_DATA,
};
pub use trend::{
    compare_periods, daily_series, daily_trend_direction, pearson, percent_change,
    recent_vs_early, Metric, RecentVsEarly, TrendDirection, TrendReading, TrendResult,
};
