use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A categorical axis the Search Console API can break results down by.
///
/// Only `date`, `query` and `page` are carried on a [`Record`]; the other
/// dimensions may be requested but their key values are not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Date,
    Query,
    Page,
    Country,
    Device,
}

impl Dimension {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Date => "date",
            Dimension::Query => "query",
            Dimension::Page => "page",
            Dimension::Country => "country",
            Dimension::Device => "device",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Dimension::Date),
            "query" => Ok(Dimension::Query),
            "page" => Ok(Dimension::Page),
            "country" => Ok(Dimension::Country),
            "device" => Ok(Dimension::Device),
            other => Err(CoreError::UnknownDimension(other.to_string())),
        }
    }
}

/// One search-analytics observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub date: Option<NaiveDate>,
    pub query: Option<String>,
    pub page: Option<String>,
    pub clicks: u64,
    pub impressions: u64,
    /// Click-through rate as a fraction in `[0, 1]`.
    pub ctr: f64,
    /// Mean ranking position, `>= 1` when the row had any impressions.
    pub position: f64,
}

impl Record {
    /// Returns the value of a record field for one of the carried dimensions.
    ///
    /// Dates are rendered as `YYYY-MM-DD`. Dimensions not carried on a record
    /// always yield `None`.
    #[must_use]
    pub fn dimension_value(&self, dimension: Dimension) -> Option<String> {
        match dimension {
            Dimension::Date => self.date.map(|d| d.format("%Y-%m-%d").to_string()),
            Dimension::Query => self.query.clone(),
            Dimension::Page => self.page.clone(),
            Dimension::Country | Dimension::Device => None,
        }
    }
}

/// The `(property, start, end, dimensions)` tuple a [`Dataset`] was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryWindow {
    pub property_url: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub dimensions: Vec<Dimension>,
}

impl QueryWindow {
    /// Builds a window, rejecting a start date later than the end date.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWindow`] if `start_date > end_date`.
    pub fn new(
        property_url: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        dimensions: Vec<Dimension>,
    ) -> Result<Self, CoreError> {
        if start_date > end_date {
            return Err(CoreError::InvalidWindow {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            property_url: property_url.into(),
            start_date,
            end_date,
            dimensions,
        })
    }

    /// Number of calendar days covered, inclusive of both ends.
    #[must_use]
    pub fn day_count(&self) -> u64 {
        let days = (self.end_date - self.start_date).num_days() + 1;
        u64::try_from(days).unwrap_or(0)
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// The window of equal length ending the day before this one starts.
    ///
    /// Returns `None` when the window is empty (start after end) or the dates
    /// would underflow the calendar.
    #[must_use]
    pub fn preceding(&self) -> Option<Self> {
        let span = self.day_count().checked_sub(1)?;
        let end_date = self.start_date.pred_opt()?;
        let start_date = end_date.checked_sub_days(Days::new(span))?;
        Some(Self {
            property_url: self.property_url.clone(),
            start_date,
            end_date,
            dimensions: self.dimensions.clone(),
        })
    }

    /// Same property and dates, different breakdown.
    #[must_use]
    pub fn with_dimensions(&self, dimensions: Vec<Dimension>) -> Self {
        Self {
            dimensions,
            ..self.clone()
        }
    }
}

/// An ordered sequence of [`Record`]s sharing one query window.
///
/// Records are only reachable by shared reference, so a dataset is immutable
/// once built. Derived datasets (filters, segments) keep the parent window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    window: Option<QueryWindow>,
    records: Vec<Record>,
}

impl Dataset {
    #[must_use]
    pub fn new(window: QueryWindow, records: Vec<Record>) -> Self {
        Self {
            window: Some(window),
            records,
        }
    }

    /// A dataset not tied to a fetch window (hand-built or derived).
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            window: None,
            records,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn window(&self) -> Option<&QueryWindow> {
        self.window.as_ref()
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn total_clicks(&self) -> u64 {
        self.records.iter().map(|r| r.clicks).sum()
    }

    #[must_use]
    pub fn total_impressions(&self) -> u64 {
        self.records.iter().map(|r| r.impressions).sum()
    }

    /// Returns a new dataset with the records matching `predicate`, in order.
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&Record) -> bool,
    {
        Self {
            window: self.window.clone(),
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
