//! Search Console API client and row normalizer for gsclens.
//!
//! [`SearchConsoleClient`] talks to the `webmasters/v3` REST API using a
//! caller-supplied OAuth access token. [`normalize_row`] turns the raw
//! `searchAnalytics` rows into validated [`gsclens_core::Record`]s.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::SearchConsoleClient;
pub use error::GscError;
pub use normalize::{normalize_row, normalize_rows, parse_date};
pub use types::{
    DimensionFilter, FilterOperator, RawRow, SearchAnalyticsRequest, SearchAnalyticsResponse,
    SiteEntry, Sitemap,
};
