//! Typed records parsed from single lines of the directory and quote feeds.
//!
//! Both feeds are plain text, one comma-separated record per line, with no header and
//! no discriminator: the caller decides which parser applies to a given feed.
//!
//! - Directory line: `company,ticker,<url>,...` where the url has at least six
//!   `/`-separated segments and the sixth one is the source id.
//! - Quote line: `seriesKey,yyyy-MM-dd,open,high,low,close,adjustedClose,volume`.
//!
//! Parsers never panic. The `Result` forms report why a line was rejected; the
//! `Option` forms are what bulk ingestion uses to skip a line and carry on.
use std::str::FromStr;

use chrono::NaiveDate;
use log::warn;
use serde::Serialize;

use crate::error::FeedError;

const DIRECTORY_MIN_FIELDS: usize = 3;
const LOCATOR_MIN_SEGMENTS: usize = 6;
const SOURCE_ID_SEGMENT: usize = 5;
const QUOTE_FIELDS: usize = 8;
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = 10;
/// Log target of the warnings emitted when a numeric token is read as 0.0.
pub const LENIENT_TARGET: &str = "lines_common::record::lenient";
/// Raw share volume is divided by this before it is stored.
pub const VOLUME_SCALE: f64 = 1_000_000.0;

/// One company's entry in the directory feed.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize)]
pub struct DirectoryEntry {
    /// Display name.
    pub company: String,
    /// Short symbol, used to build series keys.
    pub ticker: String,
    /// Opaque id of the company's quote feed on the file host.
    pub source_id: String,
}

impl FromStr for DirectoryEntry {
    type Err = FeedError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = trim_line(line).split(',').collect();
        if fields.len() < DIRECTORY_MIN_FIELDS {
            return Err(FeedError::MalformedLine {
                expected: DIRECTORY_MIN_FIELDS,
                found: fields.len(),
                unit: "fields",
            });
        }

        let segments: Vec<&str> = fields[2].split('/').collect();
        if segments.len() < LOCATOR_MIN_SEGMENTS {
            return Err(FeedError::MalformedLine {
                expected: LOCATOR_MIN_SEGMENTS,
                found: segments.len(),
                unit: "path segments",
            });
        }

        Ok(DirectoryEntry {
            company: non_empty(fields[0], "company")?.to_string(),
            ticker: non_empty(fields[1], "ticker")?.to_string(),
            source_id: segments[SOURCE_ID_SEGMENT].to_string(),
        })
    }
}

/// Parses a directory line, returning `None` when it does not have the expected shape.
pub fn parse_directory_entry(line: &str) -> Option<DirectoryEntry> {
    line.parse().ok()
}

/// What to do with a numeric quote token that does not parse.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum NumericPolicy {
    /// Substitute `0.0` and log a warning. Matches the historical feed behaviour.
    #[default]
    Lenient,
    /// Reject the whole record with [`FeedError::InvalidNumber`].
    Strict,
}

/// One trading-period observation from the quote feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRecord {
    /// `<TICKER>.<RANGE_CODE>` key of the series this row belongs to.
    pub series_key: String,
    /// Trading day.
    pub date: NaiveDate,
    /// Date token exactly as it appeared in the line.
    pub raw_date: String,
    /// Opening price.
    pub open: f64,
    /// Highest price of the period.
    pub high: f64,
    /// Lowest price of the period.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Close adjusted for splits and dividends.
    pub adjusted_close: f64,
    /// Volume in millions of shares.
    pub volume: f64,
}

impl QuoteRecord {
    /// Parses a quote line, applying `policy` to malformed numeric tokens.
    ///
    /// The date is always strict: a record without a valid date cannot be placed on a
    /// chart, so it is rejected regardless of `policy`.
    pub fn parse_with(line: &str, policy: NumericPolicy) -> Result<Self, FeedError> {
        let fields: Vec<&str> = trim_line(line).split(',').collect();
        if fields.len() < QUOTE_FIELDS {
            return Err(FeedError::MalformedLine {
                expected: QUOTE_FIELDS,
                found: fields.len(),
                unit: "fields",
            });
        }

        let raw_date = fields[1];
        let date = parse_date(raw_date)?;
        let number =
            |index: usize, field: &'static str| parse_number(fields[index], field, policy);

        Ok(QuoteRecord {
            series_key: fields[0].to_string(),
            date,
            raw_date: raw_date.to_string(),
            open: number(2, "open")?,
            high: number(3, "high")?,
            low: number(4, "low")?,
            close: number(5, "close")?,
            adjusted_close: number(6, "adjusted_close")?,
            volume: number(7, "volume")? / VOLUME_SCALE,
        })
    }
}

impl FromStr for QuoteRecord {
    type Err = FeedError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        QuoteRecord::parse_with(line, NumericPolicy::Lenient)
    }
}

/// Parses a quote line leniently, returning `None` when the line is rejected.
pub fn parse_quote_record(line: &str) -> Option<QuoteRecord> {
    line.parse().ok()
}

/// Strict `yyyy-MM-dd` date parse.
///
/// The shape is checked byte by byte first: chrono alone accepts a year sign, padding
/// spaces and single-digit months or days.
pub fn parse_date(token: &str) -> Result<NaiveDate, FeedError> {
    if !has_date_shape(token) {
        return Err(FeedError::InvalidDate(token.to_string()));
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT)
        .map_err(|_| FeedError::InvalidDate(token.to_string()))
}

fn has_date_shape(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == DATE_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn parse_number(
    token: &str,
    field: &'static str,
    policy: NumericPolicy,
) -> Result<f64, FeedError> {
    match token.parse::<f64>() {
        Ok(value) => Ok(value),
        Err(_) => match policy {
            NumericPolicy::Lenient => {
                warn!(
                    target: LENIENT_TARGET,
                    "Invalid {} value {:?}, defaulting to 0.0", field, token
                );
                Ok(0.0)
            }
            NumericPolicy::Strict => Err(FeedError::InvalidNumber {
                field,
                token: token.to_string(),
            }),
        },
    }
}

fn non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str, FeedError> {
    if value.trim().is_empty() {
        Err(FeedError::EmptyField(field))
    } else {
        Ok(value)
    }
}

/// Drops the `\r` left behind when a CRLF file is split on `\n`.
fn trim_line(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
