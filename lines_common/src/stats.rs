//! Summary statistics over one series of a quote feed.
//!
//! Aggregation is a single forward pass in two phases: a [`StatsAccumulator`] collects
//! running extrema and sums for the records whose series key matches, and
//! [`StatsAccumulator::finish`] turns them into an immutable [`StatItems`].
//!
//! "Last" always means last in input order. Feeds are expected to be chronological,
//! but if they are not, `last_close` and `last_day` still follow sequence position.
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::QuoteRecord;
use crate::series::SeriesKey;

/// Display format of [`StatItems::last_day`], e.g. `31-Jan-2023`.
pub const LAST_DAY_FORMAT: &str = "%d-%b-%Y";

/// Summary of the records of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatItems {
    /// Lowest `low` over the series.
    pub min_low: f64,
    /// Highest `high` over the series.
    pub max_high: f64,
    /// Mean of `close` over the series.
    pub avg_close: f64,
    /// `close` of the last matching record.
    pub last_close: f64,
    /// Highest `volume` (millions of shares).
    pub max_volume: f64,
    /// Number of matching records.
    pub count: usize,
    /// Date of the last matching record in display form, empty when `count == 0`.
    pub last_day: String,
    /// Date of the last matching record.
    pub last_date: Option<NaiveDate>,
}

impl StatItems {
    /// The defined value for a series with no records.
    pub fn empty() -> Self {
        StatItems {
            min_low: 0.0,
            max_high: 0.0,
            avg_close: 0.0,
            last_close: 0.0,
            max_volume: 0.0,
            count: 0,
            last_day: String::new(),
            last_date: None,
        }
    }

    /// Returns `true` when no record matched.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for StatItems {
    fn default() -> Self {
        StatItems::empty()
    }
}

impl fmt::Display for StatItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average Close: ${:.2}", self.avg_close)?;
        writeln!(f, "Min: ${:.2}", self.min_low)?;
        writeln!(f, "Max: ${:.2}", self.max_high)?;
        writeln!(f, "Close: ${:.2}", self.last_close)?;
        write!(f, "On: {}", self.last_day)
    }
}

/// Running state of one aggregation pass.
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    key: SeriesKey,
    min_low: f64,
    max_high: f64,
    max_volume: f64,
    sum_close: f64,
    last_close: f64,
    count: usize,
    last_date: Option<NaiveDate>,
}

impl StatsAccumulator {
    /// Starts a pass that accepts only records of `key`.
    pub fn new(key: SeriesKey) -> Self {
        Self {
            key,
            min_low: f64::INFINITY,
            max_high: 0.0,
            max_volume: 0.0,
            sum_close: 0.0,
            last_close: 0.0,
            count: 0,
            last_date: None,
        }
    }

    /// Folds `record` into the running values. Returns `false` (and changes nothing)
    /// when the record belongs to another series.
    pub fn push(&mut self, record: &QuoteRecord) -> bool {
        if !self.key.matches(&record.series_key) {
            return false;
        }

        self.count += 1;
        self.sum_close += record.close;
        self.last_close = record.close;
        if record.low < self.min_low {
            self.min_low = record.low;
        }
        if record.high > self.max_high {
            self.max_high = record.high;
        }
        if record.volume > self.max_volume {
            self.max_volume = record.volume;
        }
        self.last_date = Some(record.date);
        true
    }

    /// Number of records accepted so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Ends the pass. No average is computed over zero records.
    pub fn finish(self) -> StatItems {
        if self.count == 0 {
            return StatItems::empty();
        }

        StatItems {
            min_low: self.min_low,
            max_high: self.max_high,
            avg_close: self.sum_close / self.count as f64,
            last_close: self.last_close,
            max_volume: self.max_volume,
            count: self.count,
            last_day: self
                .last_date
                .map(|date| date.format(LAST_DAY_FORMAT).to_string())
                .unwrap_or_default(),
            last_date: self.last_date,
        }
    }
}

/// Reduces `records` to the statistics of the series `key`.
pub fn aggregate<'a, I>(records: I, key: &SeriesKey) -> StatItems
where
    I: IntoIterator<Item = &'a QuoteRecord>,
{
    let mut acc = StatsAccumulator::new(key.clone());
    for record in records {
        acc.push(record);
    }
    acc.finish()
}
