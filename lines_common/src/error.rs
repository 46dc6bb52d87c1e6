//! Error types shared between the feed parser and the client.
//!
//! The `FeedError` enum covers per-line rejections (shape, date, number) as well as
//! per-request failures from the fetch collaborator, so every crate in the workspace
//! can propagate a single error type.
use std::string::FromUtf8Error;

use thiserror::Error;

/// Unified error type for feed ingestion and retrieval.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Response body could not be decoded as UTF-8 text.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// A line does not have the minimum field/segment count for its shape.
    #[error("Malformed line: expected at least {expected} {unit}, found {found}")]
    MalformedLine {
        /// Minimum number of fields or segments required.
        expected: usize,
        /// Number actually present.
        found: usize,
        /// What was counted (`"fields"` or `"path segments"`).
        unit: &'static str,
    },

    /// A field that identifies the record is present but empty.
    #[error("Empty field: {0}")]
    EmptyField(&'static str),

    /// Date token is not a strict `yyyy-MM-dd` calendar date.
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    /// Numeric token could not be parsed as a floating point value.
    #[error("Invalid number in field `{field}`: {token:?}")]
    InvalidNumber {
        /// Name of the quote field.
        field: &'static str,
        /// Raw token as it appeared in the line.
        token: String,
    },

    /// Network or transport failure while fetching a locator.
    #[error("Fetch of {locator} failed: {reason}")]
    Fetch {
        /// Locator that was requested.
        locator: String,
        /// Transport-level description.
        reason: String,
    },

    /// The host answered with a non-success status.
    #[error("Fetch of {locator} returned HTTP status {status}")]
    HttpStatus {
        /// Locator that was requested.
        locator: String,
        /// Status code of the response.
        status: u16,
    },

    /// A ticker could not be resolved in the company directory.
    #[error("Ticker not found in directory: {0}")]
    TickerNotFound(String),

    /// Failure while encoding JSON output via serde_json.
    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),
}
