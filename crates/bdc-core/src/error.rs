//! Error types for extraction, persistence and analytics.
//!
//! This module defines [`BdcError`] which covers every failure the workspace
//! reports: collaborator I/O, parsing, storage and interchange errors.

use thiserror::Error;

/// Errors that can occur while extracting, storing or analyzing holdings.
#[derive(Error, Debug)]
pub enum BdcError {
    /// Network-related errors (connection failures, timeouts, HTTP status).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by the filing source.
    #[error("Rate limited by {source_name}: retry after {retry_after:?}")]
    RateLimited {
        /// The source that rate limited the request.
        source_name: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested filer could not be resolved to an identifier.
    #[error("Filer not found: {0}")]
    FilerNotFound(String),

    /// No filing matched the requested filer, form and year.
    #[error("No {form} filing found for {filer}{}", year_suffix(.year))]
    FilingNotFound {
        /// Ticker or CIK that was requested.
        filer: String,
        /// Form type that was requested.
        form: String,
        /// Fiscal year that was requested, if any.
        year: Option<i32>,
    },

    /// Error parsing a document, fact or value.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the portfolio database.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The database schema could not be loaded or applied.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Error reading or writing the CSV interchange format.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested operation is not supported by this source.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

fn year_suffix(year: &Option<i32>) -> String {
    year.map(|y| format!(" fiscal year {y}")).unwrap_or_default()
}

impl From<csv::Error> for BdcError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias using [`BdcError`].
pub type Result<T> = std::result::Result<T, BdcError>;
