//! Trend direction over daily series and period-over-period comparison.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use gsclens_core::Dataset;
use serde::Serialize;

use crate::aggregate::{global_summary, mean_of, GlobalSummary};

/// Correlation magnitude above which a series counts as trending.
const TREND_THRESHOLD: f64 = 0.3;

/// Days averaged at each end of the series by [`recent_vs_early`].
const EDGE_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Growing,
    Declining,
    Stable,
}

impl TrendDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Growing => "growing",
            TrendDirection::Declining => "declining",
            TrendDirection::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`daily_trend_direction`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendReading {
    pub direction: TrendDirection,
    /// Pearson coefficient against the day index; `None` when it is undefined
    /// (fewer than two points or a flat series).
    pub correlation: Option<f64>,
    pub points: usize,
}

impl TrendReading {
    /// True when the series was too short to classify.
    #[must_use]
    pub fn insufficient_data(&self) -> bool {
        self.points < 2
    }
}

/// Sums clicks per date, ascending by date. Undated records are skipped.
#[must_use]
pub fn daily_series(dataset: &Dataset) -> Vec<(NaiveDate, u64)> {
    let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in dataset {
        if let Some(date) = record.date {
            *by_day.entry(date).or_default() += record.clicks;
        }
    }
    by_day.into_iter().collect()
}

/// Pearson correlation of two equal-length samples.
///
/// Returns `None` for mismatched or short inputs and when either side has
/// zero variance.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Classifies a time-ordered click series as growing, declining or stable.
///
/// The correlation between position in the series and clicks stands in for
/// the slope sign: above `0.3` is growing, below `-0.3` declining. Dates are
/// only used for ordering, so gaps between days are not weighted.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn daily_trend_direction(series: &[(NaiveDate, u64)]) -> TrendReading {
    let index: Vec<f64> = (0..series.len()).map(|i| i as f64).collect();
    let clicks: Vec<f64> = series.iter().map(|(_, c)| *c as f64).collect();
    let correlation = pearson(&index, &clicks);

    let direction = match correlation {
        Some(r) if r > TREND_THRESHOLD => TrendDirection::Growing,
        Some(r) if r < -TREND_THRESHOLD => TrendDirection::Declining,
        _ => TrendDirection::Stable,
    };

    TrendReading {
        direction,
        correlation,
        points: series.len(),
    }
}

/// Metrics compared between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Clicks,
    Impressions,
    Ctr,
    Position,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Clicks,
        Metric::Impressions,
        Metric::Ctr,
        Metric::Position,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Clicks => "clicks",
            Metric::Impressions => "impressions",
            Metric::Ctr => "ctr",
            Metric::Position => "position",
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(self, summary: &GlobalSummary) -> f64 {
        match self {
            Metric::Clicks => summary.total_clicks as f64,
            Metric::Impressions => summary.total_impressions as f64,
            Metric::Ctr => summary.avg_ctr,
            Metric::Position => summary.avg_position,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(current - previous) / previous * 100`, or `None` when `previous` is zero.
#[must_use]
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

/// Period-over-period comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    /// Sign of the change in total clicks.
    pub direction: TrendDirection,
    pub current: GlobalSummary,
    pub previous: GlobalSummary,
    /// Only metrics with a non-zero previous value appear.
    pub percent_changes: BTreeMap<Metric, f64>,
}

/// Compares two periods' summaries metric by metric.
#[must_use]
pub fn compare_periods(current: &Dataset, previous: &Dataset) -> TrendResult {
    let current = global_summary(current);
    let previous = global_summary(previous);

    let percent_changes = Metric::ALL
        .into_iter()
        .filter_map(|m| percent_change(m.value(&current), m.value(&previous)).map(|p| (m, p)))
        .collect();

    let direction = match current.total_clicks.cmp(&previous.total_clicks) {
        std::cmp::Ordering::Greater => TrendDirection::Growing,
        std::cmp::Ordering::Less => TrendDirection::Declining,
        std::cmp::Ordering::Equal => TrendDirection::Stable,
    };

    TrendResult {
        direction,
        current,
        previous,
        percent_changes,
    }
}

/// Mean daily clicks over the last and first week of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecentVsEarly {
    pub recent_avg: f64,
    pub early_avg: f64,
}

impl RecentVsEarly {
    #[must_use]
    pub fn is_growth(&self) -> bool {
        self.recent_avg > self.early_avg
    }
}

/// Compares the mean of the last seven days with the mean of the first seven.
///
/// Series shorter than two weeks overlap. Returns `None` with fewer than two
/// distinct days.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn recent_vs_early(dataset: &Dataset) -> Option<RecentVsEarly> {
    let series = daily_series(dataset);
    if series.len() < 2 {
        return None;
    }
    let take = EDGE_DAYS.min(series.len());
    let early: f64 = series[..take].iter().map(|(_, c)| *c as f64).sum();
    let recent: f64 = series[series.len() - take..]
        .iter()
        .map(|(_, c)| *c as f64)
        .sum();
    Some(RecentVsEarly {
        recent_avg: mean_of(recent, take),
        early_avg: mean_of(early, take),
    })
}
