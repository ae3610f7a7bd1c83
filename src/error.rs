use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, OfferError>;

/// Failures that can occur while importing or generating offer files.
#[derive(Debug, Error)]
pub enum OfferError {
    /// Missing or invalid command line arguments.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The file to import does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O failure while reading or writing a stream.
    #[error("stream error: {0}")]
    Stream(#[from] std::io::Error),

    /// Network, HTTP status or JSON decoding failure while fetching base offers.
    #[error("failed to fetch base offers: {0}")]
    Fetch(String),

    /// A TSV data row could not be parsed back into an offer.
    #[error("invalid offer row: {reason}")]
    InvalidRow { reason: String },
}

impl From<reqwest::Error> for OfferError {
    fn from(err: reqwest::Error) -> Self {
        OfferError::Fetch(err.to_string())
    }
}

impl OfferError {
    pub(crate) fn invalid_row(reason: impl Into<String>) -> Self {
        OfferError::InvalidRow {
            reason: reason.into(),
        }
    }
}
