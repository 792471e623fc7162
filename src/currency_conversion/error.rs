use thiserror::Error;

use crate::http::HttpError;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("Rate request failed: {0}")]
    Http(#[from] HttpError),

    #[error("No quote for {from}/{to}")]
    MissingQuote { from: String, to: String },

    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Failed to get {from}/{to} rate: {source}")]
    Rate {
        from: String,
        to: String,
        #[source]
        source: RateError,
    },
}
