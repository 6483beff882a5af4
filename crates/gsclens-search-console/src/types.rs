//! Search Console API request and response types.
//!
//! Field names follow the JSON the `webmasters/v3` endpoints speak
//! (`camelCase`). Int64 counters such as sitemap warnings arrive as JSON
//! strings, so those fields accept either form.

use gsclens_core::{Dimension, QueryWindow};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// searchAnalytics.query
// ---------------------------------------------------------------------------

/// Comparison applied by a [`DimensionFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    Contains,
    NotEquals,
    NotContains,
    IncludingRegex,
    ExcludingRegex,
}

/// One filter inside the request's `dimensionFilterGroups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionFilter {
    pub dimension: Dimension,
    pub operator: FilterOperator,
    pub expression: String,
}

/// A `searchAnalytics` query: the window to fetch plus paging and filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchAnalyticsRequest {
    pub window: QueryWindow,
    pub row_limit: u32,
    pub filters: Vec<DimensionFilter>,
}

impl SearchAnalyticsRequest {
    #[must_use]
    pub fn new(window: QueryWindow, row_limit: u32) -> Self {
        Self {
            window,
            row_limit,
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: DimensionFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Wire body for `POST sites/{siteUrl}/searchAnalytics/query`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryBody<'a> {
    pub start_date: String,
    pub end_date: String,
    pub dimensions: &'a [Dimension],
    pub row_limit: u32,
    pub start_row: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimension_filter_groups: Vec<FilterGroup<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FilterGroup<'a> {
    pub filters: &'a [DimensionFilter],
}

impl<'a> QueryBody<'a> {
    pub(crate) fn from_request(request: &'a SearchAnalyticsRequest) -> Self {
        let dimension_filter_groups = if request.filters.is_empty() {
            Vec::new()
        } else {
            vec![FilterGroup {
                filters: &request.filters,
            }]
        };
        Self {
            start_date: request.window.start_date.format("%Y-%m-%d").to_string(),
            end_date: request.window.end_date.format("%Y-%m-%d").to_string(),
            dimensions: &request.window.dimensions,
            row_limit: request.row_limit,
            start_row: 0,
            dimension_filter_groups,
        }
    }
}

/// Response of a `searchAnalytics` query. `rows` is absent when nothing matched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsResponse {
    #[serde(default)]
    pub rows: Vec<RawRow>,
    #[serde(default)]
    pub response_aggregation_type: Option<String>,
}

/// A raw row: one key per requested dimension plus the metrics block.
///
/// Metrics are optional on the wire; the row normalizer applies defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub clicks: Option<f64>,
    #[serde(default)]
    pub impressions: Option<f64>,
    #[serde(default)]
    pub ctr: Option<f64>,
    #[serde(default)]
    pub position: Option<f64>,
}

// ---------------------------------------------------------------------------
// sites
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SitesResponse {
    #[serde(default)]
    pub site_entry: Vec<SiteEntry>,
}

/// A property the authenticated user can see, with their permission level
/// (`siteOwner`, `siteFullUser`, `siteRestrictedUser`, `siteUnverifiedUser`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    pub site_url: String,
    pub permission_level: String,
}

// ---------------------------------------------------------------------------
// sitemaps
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct SitemapsResponse {
    #[serde(default)]
    pub sitemap: Vec<Sitemap>,
}

/// A submitted sitemap and its processing state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sitemap {
    pub path: String,
    #[serde(default)]
    pub last_submitted: Option<String>,
    #[serde(default)]
    pub last_downloaded: Option<String>,
    #[serde(default)]
    pub is_pending: bool,
    #[serde(default)]
    pub is_sitemaps_index: bool,
    #[serde(default, rename = "type")]
    pub sitemap_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub warnings: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub errors: u64,
}

// ---------------------------------------------------------------------------
// errors
// ---------------------------------------------------------------------------

/// Google's JSON error envelope: `{"error": {"code": 403, "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Accepts `12`, `"12"` or `null`.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u64),
        Str(String),
    }

    match Option::<NumOrStr>::deserialize(deserializer)? {
        None => Ok(0),
        Some(NumOrStr::Num(n)) => Ok(n),
        Some(NumOrStr::Str(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
