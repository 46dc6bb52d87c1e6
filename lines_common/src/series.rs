//! Range codes and series keys used to select rows of a quote feed.
//!
//! A quote feed for one company interleaves several series. Each row starts with a
//! series key of the form `<TICKER>.<RANGE_CODE>`, e.g. `GOOG.D3M`.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Reporting window of a quote series.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum RangeCode {
    /// Recent daily quotes (about three months).
    #[default]
    D3M,
    /// Quarterly quotes.
    Q,
}

impl RangeCode {
    /// Human readable label shown next to the range selector.
    pub fn label(self) -> &'static str {
        match self {
            RangeCode::D3M => "daily",
            RangeCode::Q => "quarterly",
        }
    }
}

/// Composite `<TICKER>.<RANGE_CODE>` key identifying one series in a quote feed.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SeriesKey(String);

impl SeriesKey {
    /// Builds the key for `ticker` in the given range.
    pub fn new(ticker: &str, range: RangeCode) -> Self {
        SeriesKey(format!("{}.{}", ticker.trim(), range))
    }

    /// Wraps an already composed key (e.g. taken verbatim from a feed).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        SeriesKey(raw.into())
    }

    /// Key as it appears in the first column of a quote line.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when a record's key column equals this key.
    pub fn matches(&self, series_key: &str) -> bool {
        self.0 == series_key
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesKey {
    fn from(raw: &str) -> Self {
        SeriesKey::from_raw(raw)
    }
}
