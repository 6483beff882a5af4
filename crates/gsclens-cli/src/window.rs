//! Date-window arguments shared by the analysis subcommands.

use chrono::{Days, NaiveDate};
use clap::Args;
use gsclens_core::{AppConfig, Dimension, QueryWindow};

/// Days covered by the default window.
const DEFAULT_WINDOW_DAYS: u64 = 28;

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct WindowArgs {
    /// Search Console property (defaults to `GSCLENS_DEFAULT_PROPERTY`)
    #[arg(long)]
    pub property: Option<String>,
    /// First day of the window (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last day of the window (YYYY-MM-DD, defaults to yesterday)
    #[arg(long)]
    pub end: Option<NaiveDate>,
    /// Maximum number of rows to list
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

/// The default reporting window: 28 days ending yesterday.
///
/// Search Console data for the current day is incomplete, so it is excluded.
#[must_use]
pub fn default_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = today.pred_opt().unwrap_or(today);
    let start = end
        .checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS - 1))
        .unwrap_or(end);
    (start, end)
}

/// Resolves a property from the flag or the configured default.
///
/// # Errors
///
/// Returns an error when neither is set.
pub fn resolve_property(flag: Option<&str>, config: &AppConfig) -> anyhow::Result<String> {
    flag.or(config.default_property.as_deref())
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow::anyhow!("no property given; pass --property or set GSCLENS_DEFAULT_PROPERTY")
        })
}

impl WindowArgs {
    /// Builds the query window for these arguments.
    ///
    /// A missing `--end` means yesterday; a missing `--start` means 28 days
    /// ending on the chosen end date.
    ///
    /// # Errors
    ///
    /// Returns an error if no property is available or start is after end.
    pub fn to_window(
        &self,
        config: &AppConfig,
        today: NaiveDate,
        dimensions: Vec<Dimension>,
    ) -> anyhow::Result<QueryWindow> {
        let property = resolve_property(self.property.as_deref(), config)?;
        let (default_start, default_end) = default_window(today);
        let end = self.end.unwrap_or(default_end);
        let start = match (self.start, self.end) {
            (Some(start), _) => start,
            (None, None) => default_start,
            (None, Some(end)) => end
                .checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS - 1))
                .unwrap_or(end),
        };
        Ok(QueryWindow::new(property, start, end, dimensions)?)
    }
}
