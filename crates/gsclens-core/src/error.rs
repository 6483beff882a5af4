use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while loading configuration from the environment or the
/// keyword-set file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read keywords file {path}: {source}")]
    KeywordsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse keywords file: {0}")]
    KeywordsFileParse(#[from] serde_yaml::Error),

    #[error("keywords validation failed: {0}")]
    Validation(String),
}

/// Errors raised when constructing core domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid query window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("unknown dimension: {0}")]
    UnknownDimension(String),
}
