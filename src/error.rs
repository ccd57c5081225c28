//! Error types for batch fetching and candle normalization.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single candle batch request.
///
/// The fetch loop never propagates these: a failed batch is logged and
/// treated as empty so the remaining windows are still requested.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or body decoding failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// A raw candle field that could not be coerced to its numeric type.
#[derive(Debug, Error, PartialEq)]
pub enum CandleError {
    #[error("invalid start timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("failed to parse {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}
