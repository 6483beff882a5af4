use thiserror::Error;

/// Failures of the narrative generator.
///
/// The report orchestrator never propagates these: every variant is turned
/// into a user-visible notice followed by the deterministic digest.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// No usable credential or configuration for the language model.
    #[error("narrative generator unavailable: {0}")]
    Unavailable(String),

    /// The completion call was made but failed (status, quota, malformed body).
    #[error("narrative generator request failed: {0}")]
    Request(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
