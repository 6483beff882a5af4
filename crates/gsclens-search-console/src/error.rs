use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned by the Search Console client and row normalizer.
#[derive(Debug, Error)]
pub enum GscError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Search Console API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A row's key list does not line up with the requested dimensions.
    #[error("malformed row: expected {expected} dimension keys, got {actual}")]
    MalformedRow { expected: usize, actual: usize },

    /// A `date` key that is not `YYYY-MM-DD`.
    #[error("malformed row: unparsable date key '{0}'")]
    MalformedDate(String),

    /// A dated row outside the window it was fetched for.
    #[error("row dated {date} falls outside the requested window {start}..={end}")]
    OutOfWindow {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl GscError {
    /// Returns `true` for errors that indicate the API broke its row contract.
    #[must_use]
    pub fn is_malformed_row(&self) -> bool {
        matches!(
            self,
            GscError::MalformedRow { .. } | GscError::MalformedDate(_) | GscError::OutOfWindow { .. }
        )
    }
}
